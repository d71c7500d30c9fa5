// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Bot core: orchestration, rendering and interactive actions

pub mod actions;
pub mod commands;
pub mod errors;
pub mod handlers;
pub mod links;
pub mod messages;
pub mod orchestrator;
pub mod renderer;
pub mod surface;

pub use actions::{ActionRegistry, ButtonAction};
pub use errors::BotError;
pub use orchestrator::ImageBot;
pub use surface::{
    Button, ButtonStyle, ButtonTarget, Embed, EmbedField, InteractionSurface, Reply, SurfaceError,
    Tone,
};
