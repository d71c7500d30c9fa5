// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Button click handlers: single image viewer, upscale, regenerate

use tracing::{error, info, warn};

use super::actions::ButtonAction;
use super::errors::BotError;
use super::messages::{self, build_message};
use super::orchestrator::{ImageBot, StatusEditListener};
use super::surface::{Button, ButtonStyle, InteractionSurface, Reply, Tone};
use crate::diffusion::client::task_id_of;
use crate::diffusion::normalizer::draw_new_seed;
use crate::diffusion::poller::Completion;
use crate::diffusion::types::GenerationRequest;

impl ImageBot {
    /// Route a button click to its registered action
    pub async fn handle_button(&self, surface: &dyn InteractionSurface, custom_id: &str) {
        let Some(action) = self.actions.get(custom_id).await else {
            info!("{} clicked unknown button {}", surface.user_name(), custom_id);
            let reply = Reply::embed(messages::expired_action()).ephemeral();
            if let Err(e) = surface.send(reply).await {
                error!("Failed to answer expired button: {}", e);
            }
            return;
        };

        match action {
            ButtonAction::ViewImage {
                title,
                image_url,
                task_id,
            } => self.view_image(surface, &title, &image_url, &task_id).await,
            ButtonAction::Upscale { title, image_url } => {
                self.upscale(surface, &title, &image_url).await
            }
            ButtonAction::Regenerate { request } => self.regenerate(surface, request).await,
        }
    }

    /// Show one image to the clicking user only, with an upscale button
    pub async fn view_image(
        &self,
        surface: &dyn InteractionSurface,
        title: &str,
        image_url: &str,
        task_id: &str,
    ) {
        info!("{} view image of task {}", surface.user_name(), task_id);
        let custom_id = self
            .actions
            .register(ButtonAction::Upscale {
                title: title.to_string(),
                image_url: image_url.to_string(),
            })
            .await;

        let embed = build_message(title, &format!("task id : {}", task_id), Tone::Success)
            .image(image_url);
        let reply = Reply::embed(embed)
            .buttons(vec![Button::action(
                "Upscale",
                ButtonStyle::Secondary,
                custom_id,
            )])
            .ephemeral();
        if let Err(e) = surface.send(reply).await {
            error!("Failed to show image: {}", e);
        }
    }

    /// Upscale an image and show the output privately. Failures here never
    /// touch the public result message.
    pub async fn upscale(&self, surface: &dyn InteractionSurface, title: &str, image_url: &str) {
        info!("{} upscale image", surface.user_name());
        let mention = surface.user_mention();
        let upscale_title = format!("Upscale > {}", title);

        let requesting = build_message(
            &upscale_title,
            "Your task is being requested.",
            Tone::Neutral,
        );
        let reply = Reply::embed(requesting)
            .content(format!("{} Your task is being requested.", mention))
            .ephemeral();
        if let Err(e) = surface.send(reply).await {
            error!("Failed to send upscale response: {}", e);
            return;
        }

        let submitted = self
            .jobs
            .post_json(&self.endpoints.upscale(image_url), &serde_json::json!({}))
            .await;
        let task_id = match submitted.map(|response| task_id_of(&response)) {
            Ok(Some(task_id)) => task_id,
            Ok(None) => {
                warn!("Upscale response has no task_id");
                self.report_upscale_request_error(surface).await;
                return;
            }
            Err(e) => {
                error!("Failed to request upscale: {}", e);
                self.report_upscale_request_error(surface).await;
                return;
            }
        };

        let embed = build_message(
            &upscale_title,
            &format!("task id : {}", task_id),
            Tone::Neutral,
        );
        let requested = Reply::embed(embed.clone())
            .content(format!("{} Your task is successfully requested.", mention))
            .ephemeral();
        if let Err(e) = surface.edit(requested).await {
            error!("Failed to update upscale response: {}", e);
            return;
        }

        let listener = StatusEditListener {
            surface,
            embed: embed.clone(),
            mention: mention.clone(),
        };
        let polled = self
            .poller
            .poll(
                &self.endpoints.upscale_result(&task_id),
                self.config.poll_max_steps,
                Completion::Status,
                &listener,
            )
            .await
            .map_err(|e| BotError::from_poll(&task_id, e))
            .and_then(|payload| {
                payload
                    .get("output")
                    .and_then(|o| o.as_str())
                    .map(str::to_string)
                    .ok_or_else(|| {
                        BotError::MalformedResponse("upscale result has no output".to_string())
                    })
            });

        let reply = match polled {
            Ok(output) => {
                info!("{} upscale task {} completed", surface.user_name(), task_id);
                let mut embed = embed.image(output);
                embed.tone = Tone::Success;
                Reply::embed(embed).content(format!("{} Your task is completed.", mention))
            }
            Err(e) => {
                error!("{} upscale task failed: {}", surface.user_name(), e);
                messages::error_reply(&e, &mention)
            }
        };
        if let Err(e) = surface.edit(reply.ephemeral()).await {
            error!("Failed to update upscale response: {}", e);
        }
    }

    async fn report_upscale_request_error(&self, surface: &dyn InteractionSurface) {
        let reply = Reply::embed(messages::upscale_request_error()).ephemeral();
        if let Err(e) = surface.edit(reply).await {
            error!("Failed to report upscale error: {}", e);
        }
    }

    /// Resubmit `request` with a seed different from its current one, as a
    /// new message with a new task
    pub async fn regenerate(&self, surface: &dyn InteractionSurface, request: GenerationRequest) {
        let seed = draw_new_seed(&mut rand::thread_rng(), request.seed());
        info!(
            "{} regenerate image with seed {} (was {})",
            surface.user_name(),
            seed,
            request.seed()
        );
        self.submit_and_render(surface, request.with_seed(seed), Vec::new())
            .await;
    }
}
