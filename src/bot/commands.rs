// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Lookup and help commands
//!
//! Lookups answer with a placeholder before calling the Job Service and edit
//! it afterwards, so a slow service never misses the interaction deadline.

use serde::Deserialize;
use tracing::{debug, error, info, warn};

use super::errors::BotError;
use super::messages;
use super::orchestrator::ImageBot;
use super::renderer::{render_result, RenderInput};
use super::surface::{InteractionSurface, Reply};
use crate::diffusion::normalizer::normalize;
use crate::diffusion::poller::status_of;
use crate::diffusion::results::ResultSet;
use crate::diffusion::types::{GenerationParams, GenerationRequest, TaskStatus};

/// Stored parameters of a task, as submitted and not revalidated
#[derive(Debug, Deserialize)]
struct ParamsResponse {
    status: TaskStatus,
    params: GenerationParams,
}

impl ImageBot {
    /// `/result`: show a task's images, or its status while unfinished
    pub async fn lookup_result(&self, surface: &dyn InteractionSurface, task_id: &str) {
        info!("{} lookup result of {}", surface.user_name(), task_id);
        let mention = surface.user_mention();
        if !self.send_placeholder(surface, task_id, &mention).await {
            return;
        }

        let reply = match self.result_reply(task_id, &mention).await {
            Ok(reply) => reply,
            Err(e) => {
                error!("{} lookup result failed: {}", surface.user_name(), e);
                messages::error_reply(&e, &mention)
            }
        };
        if let Err(e) = surface.edit(reply).await {
            error!("Failed to send result lookup: {}", e);
        }
    }

    async fn result_reply(&self, task_id: &str, mention: &str) -> Result<Reply, BotError> {
        let payload = self.jobs.get_json(&self.endpoints.task_images(task_id)).await?;
        let status = status_of(&payload)
            .ok_or_else(|| BotError::MalformedResponse("task has no status".to_string()))?;
        if status != TaskStatus::Completed {
            return Ok(Reply::embed(messages::status_lookup(task_id, &status)).content(mention));
        }

        let results = ResultSet::from_task_payload(&payload)?;
        // The prompt and regenerate button need valid parameters; without
        // them the images are still shown.
        let request = match self.fetch_params(task_id).await {
            Ok(found) => self.revalidate(task_id, found.params),
            Err(e) => {
                warn!("No parameters for task {}: {}", task_id, e);
                None
            }
        };
        let prompt = request
            .as_ref()
            .map(|r| r.prompt().to_string())
            .unwrap_or_else(|| format!("Task {}", task_id));

        Ok(render_result(
            RenderInput {
                task_id,
                prompt: &prompt,
                request: request.as_ref(),
                results: &results,
                warnings: &[],
                mention,
                environment: self.config.environment,
            },
            &self.actions,
        )
        .await)
    }

    /// Run stored parameters through the same rounding and validation as a
    /// fresh `/generate`. `None` when they no longer pass.
    fn revalidate(&self, task_id: &str, params: GenerationParams) -> Option<GenerationRequest> {
        match normalize(params, &self.config.limits, &mut rand::thread_rng()) {
            Ok((request, warnings)) => {
                if !warnings.is_empty() {
                    debug!("Stored parameters of {} adjusted: {:?}", task_id, warnings);
                }
                Some(request)
            }
            Err(e) => {
                warn!("Stored parameters of {} are not reusable: {}", task_id, e);
                None
            }
        }
    }

    /// `/params`: show the parameters a task was submitted with
    pub async fn lookup_params(&self, surface: &dyn InteractionSurface, task_id: &str) {
        info!("{} lookup params of {}", surface.user_name(), task_id);
        let mention = surface.user_mention();
        if !self.send_placeholder(surface, task_id, &mention).await {
            return;
        }

        let reply = match self.fetch_params(task_id).await {
            Ok(found) => Reply::embed(messages::params_lookup(
                task_id,
                &found.status,
                &found.params,
            ))
            .content(mention),
            Err(e) => {
                error!("{} lookup params failed: {}", surface.user_name(), e);
                messages::error_reply(&e, &mention)
            }
        };
        if let Err(e) = surface.edit(reply).await {
            error!("Failed to send params lookup: {}", e);
        }
    }

    async fn send_placeholder(
        &self,
        surface: &dyn InteractionSurface,
        task_id: &str,
        mention: &str,
    ) -> bool {
        let reply = Reply::embed(messages::looking_up(task_id)).content(mention);
        match surface.send(reply).await {
            Ok(()) => true,
            Err(e) => {
                error!("{} Failed to send initial response: {}", surface.user_name(), e);
                false
            }
        }
    }

    async fn fetch_params(&self, task_id: &str) -> Result<ParamsResponse, BotError> {
        let payload = self.jobs.get_json(&self.endpoints.task_params(task_id)).await?;
        serde_json::from_value(payload).map_err(|e| BotError::MalformedResponse(e.to_string()))
    }

    /// `/help`
    pub async fn help(&self, surface: &dyn InteractionSurface) {
        if let Err(e) = surface.send(Reply::embed(messages::help()).ephemeral()).await {
            error!("Failed to send help: {}", e);
        }
    }
}
