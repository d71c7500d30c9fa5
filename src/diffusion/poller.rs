// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Bounded polling of Job Service task endpoints
//!
//! One loop serves generation tasks, upscale tasks and the transaction hash
//! confirmation; they differ only in the [`Completion`] check. Transient GET
//! failures consume a step and are otherwise ignored. The loop ends on
//! completion, on an explicit `error` status, or when the step budget runs out.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::client::JobService;
use super::types::TaskStatus;

/// Why a poll did not produce a completed payload
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PollError {
    /// The task reported `error`; carries the payload that said so
    #[error("task reported an error status")]
    TaskError(Value),

    /// The step budget ran out before a terminal status
    #[error("task did not finish within the polling budget")]
    Timeout,
}

impl PollError {
    /// Last payload for an explicit error, `None` for a timeout
    pub fn payload(&self) -> Option<&Value> {
        match self {
            PollError::TaskError(payload) => Some(payload),
            PollError::Timeout => None,
        }
    }
}

/// What a `completed` payload must contain before polling stops
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// `status == completed` is enough
    Status,
    /// `status == completed` and `tx_hash.completed` holds a non-empty hash
    TxHash,
}

impl Completion {
    pub fn is_done(&self, status: &TaskStatus, payload: &Value) -> bool {
        if *status != TaskStatus::Completed {
            return false;
        }
        match self {
            Completion::Status => true,
            Completion::TxHash => tx_hash_of(payload).is_some(),
        }
    }
}

/// Hash confirmed for a task, read from `tx_hash.completed`
pub fn tx_hash_of(payload: &Value) -> Option<&str> {
    payload
        .get("tx_hash")
        .and_then(|h| h.get("completed"))
        .and_then(Value::as_str)
        .filter(|h| !h.is_empty())
}

/// Status of a polled payload, `None` when the field is missing
pub fn status_of(payload: &Value) -> Option<TaskStatus> {
    payload
        .get("status")
        .and_then(Value::as_str)
        .map(TaskStatus::from)
}

/// Notified when a non-terminal status differs from the previous one
#[async_trait]
pub trait StatusListener: Send + Sync {
    async fn on_status_change(&self, previous: &TaskStatus, current: &TaskStatus);
}

/// Listener for polls with no visible progress
pub struct SilentListener;

#[async_trait]
impl StatusListener for SilentListener {
    async fn on_status_change(&self, previous: &TaskStatus, current: &TaskStatus) {
        debug!("Status changed from {} to {}", previous, current);
    }
}

/// Polls Job Service endpoints with a fixed delay between steps
#[derive(Clone)]
pub struct Poller {
    jobs: Arc<dyn JobService>,
    interval: Duration,
}

impl Poller {
    pub fn new(jobs: Arc<dyn JobService>, interval: Duration) -> Self {
        Self { jobs, interval }
    }

    /// Poll `url` up to `max_steps` times.
    ///
    /// The first observed status is compared against `pending`, so a task
    /// that goes straight from pending to completed never calls `listener`.
    /// Terminal statuses never reach `listener`, including a `completed`
    /// payload that does not satisfy `completion` yet.
    pub async fn poll(
        &self,
        url: &str,
        max_steps: u32,
        completion: Completion,
        listener: &dyn StatusListener,
    ) -> Result<Value, PollError> {
        let mut previous = TaskStatus::Pending;

        for step in 1..=max_steps {
            match self.jobs.get_json(url).await {
                Ok(payload) => match status_of(&payload) {
                    Some(status) => {
                        debug!("Step: {}/{} {}", step, max_steps, status);
                        if completion.is_done(&status, &payload) {
                            info!("Task at {} completed after {} steps", url, step);
                            return Ok(payload);
                        }
                        if status == TaskStatus::Error {
                            warn!("Task at {} reported error at step {}", url, step);
                            return Err(PollError::TaskError(payload));
                        }
                        if !status.is_terminal() && status != previous {
                            listener.on_status_change(&previous, &status).await;
                            previous = status;
                        }
                    }
                    None => {
                        warn!("Step: {}/{} payload without status from {}", step, max_steps, url);
                    }
                },
                Err(e) => {
                    warn!("Step: {}/{} poll failed: {}", step, max_steps, e);
                }
            }

            if step < max_steps {
                tokio::time::sleep(self.interval).await;
            }
        }

        warn!("Polling {} timed out after {} steps", url, max_steps);
        Err(PollError::Timeout)
    }
}
