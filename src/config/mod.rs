// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Bot configuration: CLI/env settings, deployment environment, parameter bounds

pub mod environment;
pub mod limits;
pub mod settings;

pub use environment::{Environment, EnvironmentHosts};
pub use limits::ParameterLimits;
pub use settings::{BotArgs, BotConfig};
