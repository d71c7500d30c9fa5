// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod bot;
pub mod config;
pub mod diffusion;
pub mod discord;
pub mod version;

// Re-export main types
pub use bot::{ActionRegistry, BotError, ImageBot, InteractionSurface, Reply, SurfaceError};
pub use config::{BotArgs, BotConfig, Environment, ParameterLimits};
pub use diffusion::{
    normalize, GenerationParams, GenerationRequest, JobService, JobServiceClient, PollError,
    Poller, ResultSet, TaskStatus,
};
