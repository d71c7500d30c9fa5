// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Generation pipeline: normalise, submit, poll, render
//!
//! Each public entry point is one user invocation. Failures are turned into a
//! message at the top of the invocation: before the first response they are
//! sent, afterwards the original response is edited.

use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::actions::ActionRegistry;
use super::errors::BotError;
use super::messages;
use super::renderer::{render_result, with_proof_link, RenderInput};
use super::surface::{Embed, InteractionSurface, Reply};
use crate::config::BotConfig;
use crate::diffusion::client::{task_id_of, JobService};
use crate::diffusion::endpoints::JobEndpoints;
use crate::diffusion::normalizer::normalize;
use crate::diffusion::poller::{tx_hash_of, Completion, Poller, SilentListener, StatusListener};
use crate::diffusion::results::ResultSet;
use crate::diffusion::types::{GenerationParams, GenerationRequest, TaskStatus};

/// Bot core shared by every interaction
#[derive(Clone)]
pub struct ImageBot {
    pub(super) config: Arc<BotConfig>,
    pub(super) jobs: Arc<dyn JobService>,
    pub(super) endpoints: JobEndpoints,
    pub(super) poller: Poller,
    pub(super) actions: ActionRegistry,
}

/// Edits the in-flight message whenever the polled status moves
pub(super) struct StatusEditListener<'a> {
    pub surface: &'a dyn InteractionSurface,
    pub embed: Embed,
    pub mention: String,
}

#[async_trait]
impl StatusListener for StatusEditListener<'_> {
    async fn on_status_change(&self, previous: &TaskStatus, current: &TaskStatus) {
        info!("Status changed from {} to {}", previous, current);
        let reply = messages::status_update(&self.embed, &self.mention, previous, current);
        if let Err(e) = self.surface.edit(reply).await {
            warn!("Failed to show status update: {}", e);
        }
    }
}

impl ImageBot {
    pub fn new(config: BotConfig, jobs: Arc<dyn JobService>) -> Self {
        let endpoints = JobEndpoints::new(&config.model_endpoint, &config.upscale_endpoint);
        let poller = Poller::new(jobs.clone(), config.poll_interval);
        Self {
            config: Arc::new(config),
            jobs,
            endpoints,
            poller,
            actions: ActionRegistry::new(),
        }
    }

    pub fn config(&self) -> &BotConfig {
        &self.config
    }

    pub fn actions(&self) -> &ActionRegistry {
        &self.actions
    }

    /// `/generate`: validate the parameters and run the full pipeline
    pub async fn generate(&self, surface: &dyn InteractionSurface, params: GenerationParams) {
        info!("{} generate image", surface.user_name());
        debug!("{} generate image - validate user input", surface.user_name());

        let normalized = normalize(params, &self.config.limits, &mut rand::thread_rng());
        match normalized {
            Ok((request, warnings)) => self.submit_and_render(surface, request, warnings).await,
            Err(e) => {
                let err = BotError::from(e);
                warn!("{} generate image - rejected: {}", surface.user_name(), err);
                let reply = messages::error_reply(&err, &surface.user_mention()).ephemeral();
                if let Err(e) = surface.send(reply).await {
                    error!("Failed to report invalid input: {}", e);
                }
            }
        }
    }

    /// Submit `request` as a new task and drive it to a rendered result.
    ///
    /// Also the re-entry point for regenerate, which calls it with a reseeded
    /// request on a fresh interaction.
    pub async fn submit_and_render(
        &self,
        surface: &dyn InteractionSurface,
        request: GenerationRequest,
        warnings: Vec<String>,
    ) {
        let mention = surface.user_mention();
        if let Err(e) = surface.send(messages::requesting(&request, &mention)).await {
            error!("{} Failed to send initial response: {}", surface.user_name(), e);
            return;
        }

        if let Err(e) = self.drive(surface, &request, &warnings).await {
            error!("{} Error: {}", surface.user_name(), e);
            if let Err(e) = surface.edit(messages::error_reply(&e, &mention)).await {
                error!("Failed to report error: {}", e);
            }
        }
    }

    async fn drive(
        &self,
        surface: &dyn InteractionSurface,
        request: &GenerationRequest,
        warnings: &[String],
    ) -> Result<(), BotError> {
        let mention = surface.user_mention();
        let discord = surface.context().await?;

        debug!("{} generate image - request task", surface.user_name());
        let body = json!({ "discord": discord, "params": request });
        let response = self.jobs.post_json(&self.endpoints.generate(), &body).await?;
        let task_id = task_id_of(&response).ok_or_else(|| {
            BotError::MalformedResponse("submission response has no task_id".to_string())
        })?;
        info!("{} task {} requested", surface.user_name(), task_id);

        let requested = messages::requested(request, &task_id, &mention);
        let listener = StatusEditListener {
            surface,
            embed: requested.embed.clone().unwrap_or_else(messages::unknown_error),
            mention: mention.clone(),
        };
        surface.edit(requested).await?;

        let payload = self
            .poller
            .poll(
                &self.endpoints.task_images(&task_id),
                self.config.poll_max_steps,
                Completion::Status,
                &listener,
            )
            .await
            .map_err(|e| BotError::from_poll(&task_id, e))?;

        let results = ResultSet::from_task_payload(&payload)?;
        let reply = render_result(
            RenderInput {
                task_id: &task_id,
                prompt: request.prompt(),
                request: Some(request),
                results: &results,
                warnings,
                mention: &mention,
                environment: self.config.environment,
            },
            &self.actions,
        )
        .await;
        surface.edit(reply.clone()).await?;
        info!("{} task {} completed", surface.user_name(), task_id);

        self.attach_proof_link(surface, &task_id, &reply).await;
        Ok(())
    }

    /// Wait for the task's on-chain confirmation and add its explorer link.
    /// Failures only affect the extra link and are not reported to the user.
    async fn attach_proof_link(&self, surface: &dyn InteractionSurface, task_id: &str, reply: &Reply) {
        let confirmed = self
            .poller
            .poll(
                &self.endpoints.task_tx_hash(task_id),
                self.config.tx_hash_max_steps,
                Completion::TxHash,
                &SilentListener,
            )
            .await;

        match confirmed {
            Ok(payload) => {
                let Some(tx_hash) = tx_hash_of(&payload) else {
                    return;
                };
                info!("Task {} confirmed in transaction {}", task_id, tx_hash);
                let updated = with_proof_link(reply, tx_hash, self.config.environment);
                if let Err(e) = surface.edit(updated).await {
                    warn!("Failed to add transaction link for {}: {}", task_id, e);
                }
            }
            Err(e) => debug!("No transaction hash for task {}: {}", task_id, e),
        }
    }
}
