// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Bot settings loaded from CLI flags and environment variables

use clap::Parser;
use std::time::Duration;
use url::Url;

use super::environment::Environment;
use super::limits::ParameterLimits;

/// Fabstir Imagine Discord bot
#[derive(Parser, Debug, Clone)]
#[command(name = "fabstir-imagine-bot")]
#[command(about = "Discord front-end for the Fabstir image generation service", long_about = None)]
pub struct BotArgs {
    /// Discord bot token
    #[arg(long, env = "DISCORD_BOT_TOKEN", hide_env_values = true)]
    pub bot_token: String,

    /// Register slash commands to this guild only (global registration otherwise)
    #[arg(long, env = "DISCORD_GUILD_ID")]
    pub guild_id: Option<u64>,

    /// Image generation service base URL
    #[arg(long, env = "MODEL_ENDPOINT")]
    pub model_endpoint: String,

    /// Super resolution service base URL
    #[arg(long, env = "UPSCALE_ENDPOINT")]
    pub upscale_endpoint: String,

    /// Deployment environment (dev/prod)
    #[arg(long, env = "BOT_ENVIRONMENT", default_value = "dev")]
    pub environment: Environment,

    #[arg(long, env = "IMAGE_UNIT_SIZE", default_value_t = 64)]
    pub image_unit_size: i64,

    #[arg(long, env = "IMAGE_MINIMUM_SIZE", default_value_t = 64)]
    pub image_minimum_size: i64,

    #[arg(long, env = "IMAGE_MAXIMUM_SIZE", default_value_t = 1024)]
    pub image_maximum_size: i64,

    /// Poll budget for generation and upscale tasks
    #[arg(long, env = "POLL_MAX_STEPS", default_value_t = 300)]
    pub poll_max_steps: u32,

    /// Poll budget for the transaction hash confirmation
    #[arg(long, env = "TX_HASH_MAX_STEPS", default_value_t = 60)]
    pub tx_hash_max_steps: u32,

    /// Delay between two poll requests, in milliseconds
    #[arg(long, env = "POLL_INTERVAL_MS", default_value_t = 1000)]
    pub poll_interval_ms: u64,

    /// Per-request HTTP timeout, in seconds
    #[arg(long, env = "HTTP_TIMEOUT_SECS", default_value_t = 30)]
    pub http_timeout_secs: u64,
}

/// Immutable runtime configuration shared by every invocation
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub model_endpoint: String,
    pub upscale_endpoint: String,
    pub environment: Environment,
    pub limits: ParameterLimits,
    pub poll_max_steps: u32,
    pub tx_hash_max_steps: u32,
    pub poll_interval: Duration,
    pub http_timeout: Duration,
}

impl BotConfig {
    pub fn new(model_endpoint: &str, upscale_endpoint: &str) -> Self {
        Self {
            model_endpoint: model_endpoint.trim_end_matches('/').to_string(),
            upscale_endpoint: upscale_endpoint.trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        validate_endpoint("model endpoint", &self.model_endpoint)?;
        validate_endpoint("upscale endpoint", &self.upscale_endpoint)?;
        self.limits.validate()?;
        if self.poll_max_steps == 0 {
            return Err("poll max steps must be greater than 0".to_string());
        }
        if self.tx_hash_max_steps == 0 {
            return Err("tx hash max steps must be greater than 0".to_string());
        }
        Ok(())
    }
}

fn validate_endpoint(name: &str, value: &str) -> Result<(), String> {
    let parsed = Url::parse(value).map_err(|e| format!("invalid {} '{}': {}", name, value, e))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(format!(
            "invalid {} '{}': unsupported scheme {}",
            name, value, scheme
        )),
    }
}

impl From<&BotArgs> for BotConfig {
    fn from(args: &BotArgs) -> Self {
        Self {
            model_endpoint: args.model_endpoint.trim_end_matches('/').to_string(),
            upscale_endpoint: args.upscale_endpoint.trim_end_matches('/').to_string(),
            environment: args.environment,
            limits: ParameterLimits {
                unit_size: args.image_unit_size,
                min_size: args.image_minimum_size,
                max_size: args.image_maximum_size,
            },
            poll_max_steps: args.poll_max_steps,
            tx_hash_max_steps: args.tx_hash_max_steps,
            poll_interval: Duration::from_millis(args.poll_interval_ms),
            http_timeout: Duration::from_secs(args.http_timeout_secs),
        }
    }
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            model_endpoint: "http://localhost:8000".to_string(),
            upscale_endpoint: "http://localhost:8001".to_string(),
            environment: Environment::Dev,
            limits: ParameterLimits::default(),
            poll_max_steps: 300,
            tx_hash_max_steps: 60,
            poll_interval: Duration::from_secs(1),
            http_timeout: Duration::from_secs(30),
        }
    }
}
