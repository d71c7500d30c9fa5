// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Final view of a completed generation task
//!
//! The public view only ever shows the grid preview. Unfiltered originals of
//! flagged images are reachable only through their per-image button, which is
//! answered privately.

use super::actions::{ActionRegistry, ButtonAction};
use super::links;
use super::messages::{build_message, with_request_fields};
use super::surface::{Button, ButtonStyle, Reply, Tone};
use crate::config::Environment;
use crate::diffusion::results::ResultSet;
use crate::diffusion::types::GenerationRequest;

pub const FILTERED_WARNING: &str =
    "Potentially unsafe content was detected, so some images are blurred in the preview. Open them individually to see the original.";

/// Everything the renderer needs about one completed task
pub struct RenderInput<'a> {
    pub task_id: &'a str,
    pub prompt: &'a str,
    /// Request the task was generated from. Enables the regenerate button and
    /// the parameter fields.
    pub request: Option<&'a GenerationRequest>,
    pub results: &'a ResultSet,
    /// Warnings collected while preparing the request
    pub warnings: &'a [String],
    pub mention: &'a str,
    pub environment: Environment,
}

/// Build the completed view and register its button actions
pub async fn render_result(input: RenderInput<'_>, registry: &ActionRegistry) -> Reply {
    let mut warnings: Vec<String> = input.warnings.to_vec();
    if input.results.any_filtered() {
        warnings.push(FILTERED_WARNING.to_string());
    }

    let tone = if warnings.is_empty() {
        Tone::Success
    } else {
        Tone::Caution
    };

    let mut description = format!("task id : {}", input.task_id);
    if !warnings.is_empty() {
        description.push_str("\n\n");
        description.push_str(&warnings.join("\n"));
    }

    let mut embed = build_message(input.prompt, &description, tone).image(&input.results.grid_url);
    if let Some(request) = input.request {
        embed = with_request_fields(embed, request);
    }

    let mut buttons = Vec::with_capacity(input.results.items.len() + 2);
    for (index, item) in input.results.items.iter().enumerate() {
        let label = ResultSet::label(index);
        let custom_id = registry
            .register(ButtonAction::ViewImage {
                title: format!("#{} {}", label, input.prompt),
                image_url: item.viewer_url().to_string(),
                task_id: input.task_id.to_string(),
            })
            .await;
        buttons.push(Button::action(
            format!("#{}", label),
            ButtonStyle::Secondary,
            custom_id,
        ));
    }

    if let Some(request) = input.request {
        let custom_id = registry
            .register(ButtonAction::Regenerate {
                request: request.clone(),
            })
            .await;
        buttons.push(Button::action("Regenerate", ButtonStyle::Primary, custom_id));
    }

    buttons.push(Button::link(
        "Share",
        links::share_url(input.prompt, input.task_id, input.environment),
    ));

    Reply::embed(embed)
        .content(format!("{} Your task is completed.", input.mention))
        .buttons(buttons)
}

/// Same view with the on-chain proof link appended
pub fn with_proof_link(reply: &Reply, tx_hash: &str, environment: Environment) -> Reply {
    let mut reply = reply.clone();
    reply.buttons.push(Button::link(
        "Transaction",
        links::tx_explorer_url(tx_hash, environment),
    ));
    reply
}
