// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Deployment environment (dev/prod) and the public hosts it selects

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Deployment mode of the bot. Only affects the hosts used in outbound links.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Dev,
    Prod,
}

/// Public hosts used when building share and transaction links
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnvironmentHosts {
    /// Base of the public result page, task id is appended as a path segment
    pub result_page: &'static str,
    /// Block explorer transaction prefix, tx hash is appended verbatim
    pub tx_explorer: &'static str,
}

impl Environment {
    pub fn hosts(&self) -> EnvironmentHosts {
        match self {
            Environment::Dev => EnvironmentHosts {
                result_page: "https://dev.imagine.fabstir.com/result",
                tx_explorer: "https://sepolia.basescan.org/tx/",
            },
            Environment::Prod => EnvironmentHosts {
                result_page: "https://imagine.fabstir.com/result",
                tx_explorer: "https://basescan.org/tx/",
            },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Dev => "dev",
            Environment::Prod => "prod",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dev" | "development" => Ok(Environment::Dev),
            "prod" | "production" => Ok(Environment::Prod),
            other => Err(format!("unknown environment '{}'; expected dev or prod", other)),
        }
    }
}
