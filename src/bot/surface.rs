// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Messaging surface contract consumed by the bot core
//!
//! A surface is bound to one user interaction: it sends the initial response
//! exactly once and edits it afterwards. Replies are plain data so the core
//! never depends on the chat library's builders.

use async_trait::async_trait;
use thiserror::Error;

use crate::diffusion::types::DiscordContext;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    #[error("interaction was already responded to")]
    AlreadyResponded,

    #[error("interaction has no response to edit")]
    NotResponded,

    #[error("chat platform error: {0}")]
    Platform(String),
}

/// Embed colour convention
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// Work in flight
    Neutral,
    /// Finished without warnings
    Success,
    /// Finished with warnings
    Caution,
    Failure,
}

impl Tone {
    pub fn rgb(&self) -> u32 {
        match self {
            Tone::Neutral => 0x3498db,
            Tone::Success => 0x2ecc71,
            Tone::Caution => 0xf1c40f,
            Tone::Failure => 0xe74c3c,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Embed {
    pub title: String,
    pub description: Option<String>,
    pub tone: Tone,
    pub image_url: Option<String>,
    pub fields: Vec<EmbedField>,
}

impl Embed {
    pub fn new(title: impl Into<String>, tone: Tone) -> Self {
        Self {
            title: title.into(),
            description: None,
            tone,
            image_url: None,
            fields: Vec::new(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn image(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>, inline: bool) -> Self {
        self.fields.push(EmbedField {
            name: name.into(),
            value: value.into(),
            inline,
        });
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonStyle {
    Primary,
    Secondary,
}

/// What happens when a button is pressed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ButtonTarget {
    /// Opens an external URL, no callback
    Link(String),
    /// Dispatched back to the bot under this custom id
    Action(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub style: ButtonStyle,
    pub target: ButtonTarget,
}

impl Button {
    pub fn link(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            style: ButtonStyle::Secondary,
            target: ButtonTarget::Link(url.into()),
        }
    }

    pub fn action(label: impl Into<String>, style: ButtonStyle, custom_id: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            style,
            target: ButtonTarget::Action(custom_id.into()),
        }
    }
}

/// Full state of a message. An edit replaces every part of it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reply {
    pub content: Option<String>,
    pub embed: Option<Embed>,
    pub buttons: Vec<Button>,
    /// Visible to the invoking user only
    pub ephemeral: bool,
}

impl Reply {
    pub fn embed(embed: Embed) -> Self {
        Self {
            embed: Some(embed),
            ..Self::default()
        }
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn buttons(mut self, buttons: Vec<Button>) -> Self {
        self.buttons = buttons;
        self
    }

    pub fn ephemeral(mut self) -> Self {
        self.ephemeral = true;
        self
    }
}

/// One user interaction on the chat platform
#[async_trait]
pub trait InteractionSurface: Send + Sync {
    /// Send the initial response. Fails if one was already sent.
    async fn send(&self, reply: Reply) -> Result<(), SurfaceError>;

    /// Replace the initial response
    async fn edit(&self, reply: Reply) -> Result<(), SurfaceError>;

    /// Identifiers of the interaction, including the rendered response once sent
    async fn context(&self) -> Result<DiscordContext, SurfaceError>;

    fn user_name(&self) -> String;

    /// Mention markup for the invoking user
    fn user_mention(&self) -> String;
}
