// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Gateway event handler and client startup

use anyhow::{Context as _, Result};
use serenity::all::{
    Command, CommandInteraction, ComponentInteraction, Context, EventHandler, GatewayIntents,
    GuildId, Interaction, Ready,
};
use serenity::async_trait;
use serenity::Client;
use tracing::{error, info, warn};

use super::commands::{self, generation_params, option_values, task_id_option};
use super::interaction::{InteractionKind, SerenitySurface};
use crate::bot::{messages, ActionRegistry, ImageBot, InteractionSurface, Reply};

pub struct Handler {
    bot: ImageBot,
    /// Register commands on one guild instead of globally
    guild_id: Option<u64>,
}

impl Handler {
    pub fn new(bot: ImageBot, guild_id: Option<u64>) -> Self {
        Self { bot, guild_id }
    }

    async fn dispatch_command(bot: ImageBot, ctx: Context, cmd: CommandInteraction) {
        let name = cmd.data.name.clone();
        let options = option_values(cmd.data.options());
        let surface = SerenitySurface::new(ctx.http.clone(), InteractionKind::Command(cmd));

        match name.as_str() {
            commands::GENERATE => bot.generate(&surface, generation_params(&options)).await,
            commands::RESULT | commands::PARAMS => {
                let Some(task_id) = task_id_option(&options) else {
                    let reply = Reply::embed(messages::build_error_message(
                        "Missing task id",
                        "Please provide the task id to look up.",
                    ))
                    .ephemeral();
                    if let Err(e) = surface.send(reply).await {
                        error!("Failed to answer /{}: {}", name, e);
                    }
                    return;
                };
                if name == commands::RESULT {
                    bot.lookup_result(&surface, &task_id).await
                } else {
                    bot.lookup_params(&surface, &task_id).await
                }
            }
            commands::HELP => bot.help(&surface).await,
            other => warn!("Ignoring unknown command /{}", other),
        }
    }

    async fn dispatch_component(bot: ImageBot, ctx: Context, comp: ComponentInteraction) {
        let custom_id = comp.data.custom_id.clone();
        if !ActionRegistry::owns(&custom_id) {
            warn!("Ignoring foreign component {}", custom_id);
            return;
        }
        let surface = SerenitySurface::new(ctx.http.clone(), InteractionKind::Component(comp));
        bot.handle_button(&surface, &custom_id).await;
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("{} is connected", ready.user.name);

        let definitions = commands::definitions();
        let registered = match self.guild_id {
            Some(id) => GuildId::new(id)
                .set_commands(&ctx.http, definitions)
                .await
                .map(|cmds| cmds.len()),
            None => Command::set_global_commands(&ctx.http, definitions)
                .await
                .map(|cmds| cmds.len()),
        };
        match registered {
            Ok(count) => info!("Registered {} slash commands", count),
            Err(e) => error!("Failed to register slash commands: {}", e),
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        // Each invocation runs on its own task so a slow poll never blocks
        // the gateway, and a panic stays inside that invocation.
        let bot = self.bot.clone();
        let task = match interaction {
            Interaction::Command(cmd) => {
                tokio::spawn(Self::dispatch_command(bot, ctx, cmd))
            }
            Interaction::Component(comp) => {
                tokio::spawn(Self::dispatch_component(bot, ctx, comp))
            }
            _ => return,
        };
        tokio::spawn(async move {
            if let Err(e) = task.await {
                if e.is_panic() {
                    error!("Interaction handler panicked: {}", e);
                }
            }
        });
    }
}

/// Connect to the gateway and serve interactions until the client stops
pub async fn run(token: &str, guild_id: Option<u64>, bot: ImageBot) -> Result<()> {
    let handler = Handler::new(bot, guild_id);
    let mut client = Client::builder(token, GatewayIntents::non_privileged())
        .event_handler(handler)
        .await
        .context("Failed to create Discord client")?;

    client.start().await.context("Discord client stopped")?;
    Ok(())
}
