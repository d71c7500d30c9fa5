// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image generation jobs: request types, normalisation, Job Service client and polling

pub mod client;
pub mod endpoints;
pub mod normalizer;
pub mod poller;
pub mod results;
pub mod types;

pub use client::{JobService, JobServiceClient, RawErrorBody};
pub use endpoints::JobEndpoints;
pub use normalizer::{normalize, NormalizeError};
pub use poller::{Completion, PollError, Poller, SilentListener, StatusListener};
pub use results::{ResultItem, ResultSet, ResultSetError};
pub use types::{
    DiscordContext, FieldError, GenerationParams, GenerationRequest, ModelId, SchedulerId,
    TaskStatus, ValidationError,
};
