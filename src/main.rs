// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{anyhow, Result};
use clap::Parser;
use fabstir_imagine_bot::{
    config::{BotArgs, BotConfig},
    diffusion::JobServiceClient,
    discord, version, ImageBot,
};
use std::{env, sync::Arc};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    info!("Starting {}", version::get_version_string());
    info!("Build version: {}", version::VERSION);

    let args = BotArgs::parse();
    let config = BotConfig::from(&args);
    config
        .validate()
        .map_err(|e| anyhow!("Invalid configuration: {}", e))?;
    info!(
        "Environment: {}, model endpoint: {}, upscale endpoint: {}",
        config.environment, config.model_endpoint, config.upscale_endpoint
    );

    let jobs = JobServiceClient::new(config.http_timeout)?;
    let bot = ImageBot::new(config, Arc::new(jobs));

    discord::run(&args.bot_token, args.guild_id, bot).await
}
