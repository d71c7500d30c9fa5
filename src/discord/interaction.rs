// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! [`InteractionSurface`] over serenity command and component interactions

use async_trait::async_trait;
use serenity::all::{
    ButtonStyle as SerenityButtonStyle, CommandInteraction, ComponentInteraction,
    CreateActionRow, CreateAllowedMentions, CreateButton, CreateEmbed,
    CreateInteractionResponse, CreateInteractionResponseMessage, EditInteractionResponse, Http,
    Message, User,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::bot::surface::{
    Button, ButtonStyle, ButtonTarget, Embed, InteractionSurface, Reply, SurfaceError,
};
use crate::diffusion::types::DiscordContext;

/// Discord allows at most five buttons per action row
const BUTTONS_PER_ROW: usize = 5;

pub enum InteractionKind {
    Command(CommandInteraction),
    Component(ComponentInteraction),
}

/// One slash command or button click
pub struct SerenitySurface {
    http: Arc<Http>,
    interaction: InteractionKind,
    responded: AtomicBool,
}

impl SerenitySurface {
    pub fn new(http: Arc<Http>, interaction: InteractionKind) -> Self {
        Self {
            http,
            interaction,
            responded: AtomicBool::new(false),
        }
    }

    fn user(&self) -> &User {
        match &self.interaction {
            InteractionKind::Command(cmd) => &cmd.user,
            InteractionKind::Component(comp) => &comp.user,
        }
    }

    async fn original_response(&self) -> serenity::Result<Message> {
        match &self.interaction {
            InteractionKind::Command(cmd) => cmd.get_response(&self.http).await,
            InteractionKind::Component(comp) => comp.get_response(&self.http).await,
        }
    }
}

fn platform_error(e: serenity::Error) -> SurfaceError {
    SurfaceError::Platform(e.to_string())
}

fn build_embed(embed: &Embed) -> CreateEmbed {
    let mut builder = CreateEmbed::new()
        .title(&embed.title)
        .color(embed.tone.rgb());
    if let Some(ref description) = embed.description {
        builder = builder.description(description);
    }
    if let Some(ref url) = embed.image_url {
        builder = builder.image(url);
    }
    for field in &embed.fields {
        builder = builder.field(&field.name, &field.value, field.inline);
    }
    builder
}

fn build_button(button: &Button) -> CreateButton {
    match &button.target {
        ButtonTarget::Link(url) => CreateButton::new_link(url).label(&button.label),
        ButtonTarget::Action(custom_id) => {
            let style = match button.style {
                ButtonStyle::Primary => SerenityButtonStyle::Primary,
                ButtonStyle::Secondary => SerenityButtonStyle::Secondary,
            };
            CreateButton::new(custom_id).label(&button.label).style(style)
        }
    }
}

fn build_action_rows(buttons: &[Button]) -> Vec<CreateActionRow> {
    buttons
        .chunks(BUTTONS_PER_ROW)
        .map(|row| CreateActionRow::Buttons(row.iter().map(build_button).collect()))
        .collect()
}

fn allowed_mentions() -> CreateAllowedMentions {
    CreateAllowedMentions::new().all_users(true)
}

fn build_response(reply: &Reply) -> CreateInteractionResponse {
    let mut message = CreateInteractionResponseMessage::new()
        .ephemeral(reply.ephemeral)
        .allowed_mentions(allowed_mentions())
        .components(build_action_rows(&reply.buttons));
    if let Some(ref content) = reply.content {
        message = message.content(content);
    }
    if let Some(ref embed) = reply.embed {
        message = message.embed(build_embed(embed));
    }
    CreateInteractionResponse::Message(message)
}

fn build_edit(reply: &Reply) -> EditInteractionResponse {
    EditInteractionResponse::new()
        .content(reply.content.clone().unwrap_or_default())
        .embeds(reply.embed.iter().map(build_embed).collect())
        .components(build_action_rows(&reply.buttons))
        .allowed_mentions(allowed_mentions())
}

#[async_trait]
impl InteractionSurface for SerenitySurface {
    async fn send(&self, reply: Reply) -> Result<(), SurfaceError> {
        if self.responded.swap(true, Ordering::SeqCst) {
            return Err(SurfaceError::AlreadyResponded);
        }
        let response = build_response(&reply);
        let sent = match &self.interaction {
            InteractionKind::Command(cmd) => cmd.create_response(&*self.http, response).await,
            InteractionKind::Component(comp) => comp.create_response(&*self.http, response).await,
        };
        if let Err(e) = sent {
            self.responded.store(false, Ordering::SeqCst);
            return Err(platform_error(e));
        }
        Ok(())
    }

    async fn edit(&self, reply: Reply) -> Result<(), SurfaceError> {
        if !self.responded.load(Ordering::SeqCst) {
            return Err(SurfaceError::NotResponded);
        }
        let edit = build_edit(&reply);
        let edited = match &self.interaction {
            InteractionKind::Command(cmd) => cmd.edit_response(&*self.http, edit).await,
            InteractionKind::Component(comp) => comp.edit_response(&*self.http, edit).await,
        };
        edited.map(|_| ()).map_err(platform_error)
    }

    async fn context(&self) -> Result<DiscordContext, SurfaceError> {
        let (guild_id, channel_id) = match &self.interaction {
            InteractionKind::Command(cmd) => (cmd.guild_id, cmd.channel_id),
            InteractionKind::Component(comp) => (comp.guild_id, comp.channel_id),
        };
        let message_id = if self.responded.load(Ordering::SeqCst) {
            Some(
                self.original_response()
                    .await
                    .map_err(platform_error)?
                    .id
                    .to_string(),
            )
        } else {
            None
        };
        Ok(DiscordContext {
            user_id: self.user().id.to_string(),
            guild_id: guild_id.map(|g| g.to_string()),
            channel_id: channel_id.to_string(),
            message_id,
        })
    }

    fn user_name(&self) -> String {
        self.user().name.clone()
    }

    fn user_mention(&self) -> String {
        format!("<@{}>", self.user().id)
    }
}
