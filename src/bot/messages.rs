// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Embeds and replies shown to users

use super::errors::BotError;
use super::surface::{Embed, Reply, Tone};
use crate::diffusion::types::{GenerationParams, GenerationRequest, TaskStatus, ValidationError};

/// Discord rejects embed titles longer than this
pub const MAX_TITLE_LEN: usize = 256;

const ELLIPSIS: &str = "...";

/// Cut `title` to [`MAX_TITLE_LEN`] characters, ending in an ellipsis when cut
pub fn truncate_title(title: &str) -> String {
    if title.chars().count() <= MAX_TITLE_LEN {
        return title.to_string();
    }
    let kept: String = title.chars().take(MAX_TITLE_LEN - ELLIPSIS.len()).collect();
    format!("{}{}", kept, ELLIPSIS)
}

pub fn build_message(title: &str, description: &str, tone: Tone) -> Embed {
    Embed::new(truncate_title(title), tone).description(description)
}

pub fn build_error_message(title: &str, description: &str) -> Embed {
    build_message(title, description, Tone::Failure)
}

/// First response of a generation, sent before the task exists
pub fn requesting(request: &GenerationRequest, mention: &str) -> Reply {
    let embed = build_message(
        request.prompt(),
        "Your task is being requested.",
        Tone::Neutral,
    );
    Reply::embed(embed).content(format!("{} Your task is being requested.", mention))
}

pub fn requested(request: &GenerationRequest, task_id: &str, mention: &str) -> Reply {
    let embed = build_message(
        request.prompt(),
        &format!("task id : {}", task_id),
        Tone::Neutral,
    );
    Reply::embed(embed).content(format!("{} Your task is successfully requested.", mention))
}

pub fn status_update(
    embed: &Embed,
    mention: &str,
    previous: &TaskStatus,
    current: &TaskStatus,
) -> Reply {
    Reply::embed(embed.clone()).content(format!(
        "{} Your task's status is updated from {} to {}",
        mention, previous, current
    ))
}

pub fn validation_error(error: &ValidationError) -> Embed {
    let description = error
        .errors()
        .iter()
        .map(|e| format!("- {}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("\n");
    build_error_message("Invalid Input", &description)
}

pub fn request_error() -> Embed {
    build_error_message(
        "Request Error",
        "The request failed.\nPlease try again in a moment.\nIf the situation repeats, please let our community manager know.",
    )
}

pub fn upscale_request_error() -> Embed {
    build_error_message(
        "Upscale Request Error",
        "The request failed.\nPlease try again in a moment.\nIf the situation repeats, please let our community manager know.",
    )
}

pub fn timeout_error(task_id: &str) -> Embed {
    build_error_message(
        "Timeout Error",
        &format!(
            "Your task could not be finished in time because there are too many tasks on the server.\nYou can look it up later with `/result {}`, or let the community manager know your task id: {}",
            task_id, task_id
        ),
    )
}

pub fn task_error(task_id: &str) -> Embed {
    build_error_message(
        "Task Error",
        &format!(
            "An error occurred while processing your task.\nPlease try again, and if the situation repeats let the community manager know your task id: {}",
            task_id
        ),
    )
}

pub fn unknown_error() -> Embed {
    build_error_message(
        "Unknown Error",
        "Sorry, something went wrong on our side.\nPlease report this to our community manager.",
    )
}

pub fn expired_action() -> Embed {
    build_error_message(
        "Expired",
        "This button is no longer available. Please run the command again.",
    )
}

/// User facing reply for an invocation failure
pub fn error_reply(error: &BotError, mention: &str) -> Reply {
    let embed = match error {
        BotError::Validation(v) => validation_error(v),
        BotError::Transport(_) => request_error(),
        BotError::TaskError { task_id } => task_error(task_id),
        BotError::Timeout { task_id } => timeout_error(task_id),
        BotError::MalformedResponse(_) | BotError::Surface(_) | BotError::Unknown(_) => {
            unknown_error()
        }
    };
    Reply::embed(embed).content(mention.to_string())
}

/// Generation parameters as embed fields
pub fn with_request_fields(embed: Embed, request: &GenerationRequest) -> Embed {
    let mut embed = embed
        .field("Seed", request.seed().to_string(), true)
        .field("Steps", request.steps().to_string(), true)
        .field(
            "Size",
            format!("{}x{}", request.width(), request.height()),
            true,
        )
        .field("Images", request.images().to_string(), true)
        .field("Guidance Scale", request.guidance_scale().to_string(), true);
    if let Some(model) = request.model() {
        embed = embed.field("Model", model.as_str(), true);
    }
    if let Some(scheduler) = request.scheduler() {
        embed = embed.field("Scheduler", scheduler.as_str(), true);
    }
    if let Some(negative) = request.negative_prompt() {
        embed = embed.field("Negative Prompt", negative, false);
    }
    embed
}

/// Parameters a task was stored with, shown as given. Absent values are
/// omitted; a size with one side missing shows `?` for it.
pub fn params_lookup(task_id: &str, status: &TaskStatus, params: &GenerationParams) -> Embed {
    let title = if params.prompt.trim().is_empty() {
        format!("Task {}", task_id)
    } else {
        params.prompt.clone()
    };
    let mut embed = build_message(
        &title,
        &format!("task id : {}\nstatus : {}", task_id, status),
        Tone::Success,
    );
    let show = |value: Option<i64>| value.map_or_else(|| "?".to_string(), |v| v.to_string());
    if let Some(seed) = params.seed {
        embed = embed.field("Seed", seed.to_string(), true);
    }
    if let Some(steps) = params.steps {
        embed = embed.field("Steps", steps.to_string(), true);
    }
    if params.width.is_some() || params.height.is_some() {
        embed = embed.field(
            "Size",
            format!("{}x{}", show(params.width), show(params.height)),
            true,
        );
    }
    if let Some(images) = params.images {
        embed = embed.field("Images", images.to_string(), true);
    }
    if let Some(guidance_scale) = params.guidance_scale {
        embed = embed.field("Guidance Scale", guidance_scale.to_string(), true);
    }
    if let Some(ref model) = params.model {
        embed = embed.field("Model", model, true);
    }
    if let Some(ref scheduler) = params.scheduler {
        embed = embed.field("Scheduler", scheduler, true);
    }
    if let Some(ref negative) = params.negative_prompt {
        embed = embed.field("Negative Prompt", negative, false);
    }
    embed
}

/// Placeholder answered before a lookup reaches the Job Service
pub fn looking_up(task_id: &str) -> Embed {
    build_message(
        &format!("Task {}", task_id),
        "Looking up your task.",
        Tone::Neutral,
    )
}

pub fn status_lookup(task_id: &str, status: &TaskStatus) -> Embed {
    let tone = if *status == TaskStatus::Error {
        Tone::Failure
    } else {
        Tone::Neutral
    };
    build_message(
        &format!("Task {}", task_id),
        &format!("Your task is {}. Please check again later.", status),
        tone,
    )
}

pub fn help() -> Embed {
    Embed::new("Fabstir Imagine", Tone::Neutral)
        .description("Generate images from a text prompt.")
        .field(
            "/generate",
            "prompt: try adding increments such as 'oil on canvas', 'a painting', 'a book cover'\n\
             steps: more steps can increase quality but take longer (1-100)\n\
             seed: random seed, drawn at random when omitted\n\
             width / height: image size, rounded down to a multiple of the unit size\n\
             images: how many images to generate (1-4)\n\
             guidance_scale: how much the prompt influences the result (0-50)\n\
             model / scheduler: diffusion model and noise scheduler\n\
             negative_prompt: what the image should not contain",
            false,
        )
        .field(
            "/result task_id",
            "Show the images of a finished task",
            false,
        )
        .field(
            "/params task_id",
            "Show the parameters a task was generated with",
            false,
        )
        .field(
            "Buttons",
            "Open a single image privately, upscale it, regenerate with a new seed, or share the result",
            false,
        )
}
