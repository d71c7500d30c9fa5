// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Failures of a single bot invocation
//!
//! Every variant is caught at the top of the invocation and turned into one
//! user facing message; none of them escapes to the gateway.

use thiserror::Error;

use super::surface::SurfaceError;
use crate::diffusion::client::RawErrorBody;
use crate::diffusion::normalizer::NormalizeError;
use crate::diffusion::poller::PollError;
use crate::diffusion::results::ResultSetError;
use crate::diffusion::types::ValidationError;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BotError {
    #[error("validation failed: {0}")]
    Validation(ValidationError),

    #[error("request failed: {0}")]
    Transport(RawErrorBody),

    #[error("task {task_id} reported an error")]
    TaskError { task_id: String },

    #[error("task {task_id} timed out")]
    Timeout { task_id: String },

    #[error("malformed job service response: {0}")]
    MalformedResponse(String),

    #[error("messaging surface error: {0}")]
    Surface(#[from] SurfaceError),

    #[error("unknown error: {0}")]
    Unknown(String),
}

impl BotError {
    /// Map a poll failure for `task_id`
    pub fn from_poll(task_id: &str, err: PollError) -> Self {
        match err {
            PollError::Timeout => BotError::Timeout {
                task_id: task_id.to_string(),
            },
            PollError::TaskError(_) => BotError::TaskError {
                task_id: task_id.to_string(),
            },
        }
    }
}

impl From<RawErrorBody> for BotError {
    fn from(err: RawErrorBody) -> Self {
        BotError::Transport(err)
    }
}

impl From<NormalizeError> for BotError {
    fn from(err: NormalizeError) -> Self {
        match err {
            NormalizeError::Validation(v) => BotError::Validation(v),
            NormalizeError::Unknown(e) => BotError::Unknown(e),
        }
    }
}

impl From<ResultSetError> for BotError {
    fn from(err: ResultSetError) -> Self {
        BotError::MalformedResponse(err.to_string())
    }
}
