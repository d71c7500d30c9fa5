// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Generation request, submission context and task status types

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::config::limits::{
    ParameterLimits, DEFAULT_GUIDANCE_SCALE, DEFAULT_IMAGES, DEFAULT_IMAGE_SIZE, DEFAULT_STEPS,
    GUIDANCE_SCALE_RANGE, IMAGES_RANGE, MAX_NEGATIVE_PROMPT_LEN, SEED_RANGE, STEPS_RANGE,
};

/// Status of a task tracked by the Job Service
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TaskStatus {
    Pending,
    Assigned,
    Completed,
    Error,
    /// Any status string outside the known set, kept verbatim
    Other(String),
}

impl TaskStatus {
    pub fn as_str(&self) -> &str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Assigned => "assigned",
            TaskStatus::Completed => "completed",
            TaskStatus::Error => "error",
            TaskStatus::Other(s) => s.as_str(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Error)
    }
}

impl From<&str> for TaskStatus {
    fn from(s: &str) -> Self {
        match s {
            "pending" => TaskStatus::Pending,
            "assigned" => TaskStatus::Assigned,
            "completed" => TaskStatus::Completed,
            "error" => TaskStatus::Error,
            other => TaskStatus::Other(other.to_string()),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for TaskStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TaskStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(TaskStatus::from(s.as_str()))
    }
}

/// Diffusion models offered by the generation service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelId {
    #[serde(rename = "stable-diffusion-v1-4")]
    StableDiffusionV14,
    #[serde(rename = "stable-diffusion-v1-5")]
    StableDiffusionV15,
    #[serde(rename = "stable-diffusion-v2-0")]
    StableDiffusionV20,
    #[serde(rename = "stable-diffusion-v2-1")]
    StableDiffusionV21,
}

impl ModelId {
    pub const ALL: &'static [ModelId] = &[
        ModelId::StableDiffusionV14,
        ModelId::StableDiffusionV15,
        ModelId::StableDiffusionV20,
        ModelId::StableDiffusionV21,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelId::StableDiffusionV14 => "stable-diffusion-v1-4",
            ModelId::StableDiffusionV15 => "stable-diffusion-v1-5",
            ModelId::StableDiffusionV20 => "stable-diffusion-v2-0",
            ModelId::StableDiffusionV21 => "stable-diffusion-v2-1",
        }
    }
}

impl FromStr for ModelId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModelId::ALL
            .iter()
            .copied()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| {
                let allowed: Vec<&str> = ModelId::ALL.iter().map(|m| m.as_str()).collect();
                format!("unknown model '{}'; allowed: {}", s, allowed.join(", "))
            })
    }
}

/// Noise schedulers offered by the generation service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchedulerId {
    Ddim,
    Pndm,
    KLms,
    Euler,
    #[serde(rename = "euler_a")]
    EulerAncestral,
    DpmSolver,
}

impl SchedulerId {
    pub const ALL: &'static [SchedulerId] = &[
        SchedulerId::Ddim,
        SchedulerId::Pndm,
        SchedulerId::KLms,
        SchedulerId::Euler,
        SchedulerId::EulerAncestral,
        SchedulerId::DpmSolver,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SchedulerId::Ddim => "ddim",
            SchedulerId::Pndm => "pndm",
            SchedulerId::KLms => "k_lms",
            SchedulerId::Euler => "euler",
            SchedulerId::EulerAncestral => "euler_a",
            SchedulerId::DpmSolver => "dpm_solver",
        }
    }
}

impl FromStr for SchedulerId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SchedulerId::ALL
            .iter()
            .copied()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| {
                let allowed: Vec<&str> = SchedulerId::ALL.iter().map(|m| m.as_str()).collect();
                format!("unknown scheduler '{}'; allowed: {}", s, allowed.join(", "))
            })
    }
}

/// Identifiers of the interaction a task originates from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscordContext {
    pub user_id: String,
    pub guild_id: Option<String>,
    pub channel_id: String,
    pub message_id: Option<String>,
}

/// Raw generation input, before rounding and validation. Built from slash
/// command options or read back from the Job Service's stored parameters.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GenerationParams {
    pub prompt: String,
    pub steps: Option<i64>,
    pub seed: Option<i64>,
    pub width: Option<i64>,
    pub height: Option<i64>,
    pub images: Option<i64>,
    pub guidance_scale: Option<f64>,
    pub model: Option<String>,
    pub scheduler: Option<String>,
    pub negative_prompt: Option<String>,
}

impl GenerationParams {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Self::default()
        }
    }
}

/// A single violated constraint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Every violated field of a rejected request, in declaration order
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}", format_field_errors(.0))]
pub struct ValidationError(pub Vec<FieldError>);

fn format_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationError {
    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    pub fn fields(&self) -> Vec<&'static str> {
        self.0.iter().map(|e| e.field).collect()
    }
}

/// Validated generation parameters submitted to the Job Service.
///
/// Only constructible through [`GenerationRequest::try_from_params`], so a
/// value always satisfies the configured bounds. The seed is the only field
/// that can be replaced afterwards, see [`GenerationRequest::with_seed`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationRequest {
    prompt: String,
    steps: u32,
    seed: u64,
    width: u32,
    height: u32,
    images: u32,
    guidance_scale: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<ModelId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    scheduler: Option<SchedulerId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    negative_prompt: Option<String>,
}

impl GenerationRequest {
    /// Validate `params` against `limits`, filling defaults for absent fields.
    ///
    /// Width and height are checked as given: rounding to the unit grid is the
    /// normaliser's job and must happen before this call. A missing seed is
    /// reported as a violation.
    pub fn try_from_params(
        params: &GenerationParams,
        limits: &ParameterLimits,
    ) -> Result<Self, ValidationError> {
        let mut errors = Vec::new();
        let mut violation = |field: &'static str, message: String| {
            errors.push(FieldError { field, message });
        };

        if params.prompt.trim().is_empty() {
            violation("prompt", "prompt must not be empty".to_string());
        }

        let steps = params.steps.unwrap_or(DEFAULT_STEPS);
        if !STEPS_RANGE.contains(&steps) {
            violation("steps", range_message(&STEPS_RANGE, steps));
        }

        let seed = params.seed.unwrap_or(-1);
        if params.seed.is_none() {
            violation("seed", "seed is required".to_string());
        } else if !SEED_RANGE.contains(&seed) {
            violation("seed", range_message(&SEED_RANGE, seed));
        }

        let size_range = limits.size_range();
        let width = params.width.unwrap_or(DEFAULT_IMAGE_SIZE);
        if !size_range.contains(&width) {
            violation("width", range_message(&size_range, width));
        } else if width % limits.unit_size != 0 {
            violation(
                "width",
                format!("must be a multiple of {}, got {}", limits.unit_size, width),
            );
        }

        let height = params.height.unwrap_or(DEFAULT_IMAGE_SIZE);
        if !size_range.contains(&height) {
            violation("height", range_message(&size_range, height));
        } else if height % limits.unit_size != 0 {
            violation(
                "height",
                format!("must be a multiple of {}, got {}", limits.unit_size, height),
            );
        }

        let images = params.images.unwrap_or(DEFAULT_IMAGES);
        if !IMAGES_RANGE.contains(&images) {
            violation("images", range_message(&IMAGES_RANGE, images));
        }

        let guidance_scale = params.guidance_scale.unwrap_or(DEFAULT_GUIDANCE_SCALE);
        if !GUIDANCE_SCALE_RANGE.contains(&guidance_scale) {
            violation(
                "guidance_scale",
                format!(
                    "must be between {} and {}, got {}",
                    GUIDANCE_SCALE_RANGE.start(),
                    GUIDANCE_SCALE_RANGE.end(),
                    guidance_scale
                ),
            );
        }

        let model = match params.model.as_deref() {
            None => None,
            Some(raw) => match raw.parse::<ModelId>() {
                Ok(model) => Some(model),
                Err(e) => {
                    violation("model", e);
                    None
                }
            },
        };

        let scheduler = match params.scheduler.as_deref() {
            None => None,
            Some(raw) => match raw.parse::<SchedulerId>() {
                Ok(scheduler) => Some(scheduler),
                Err(e) => {
                    violation("scheduler", e);
                    None
                }
            },
        };

        if let Some(negative) = params.negative_prompt.as_deref() {
            if negative.trim().is_empty() {
                violation(
                    "negative_prompt",
                    "negative prompt must not be empty when provided".to_string(),
                );
            } else if negative.chars().count() > MAX_NEGATIVE_PROMPT_LEN {
                violation(
                    "negative_prompt",
                    format!(
                        "must be at most {} characters, got {}",
                        MAX_NEGATIVE_PROMPT_LEN,
                        negative.chars().count()
                    ),
                );
            }
        }

        if !errors.is_empty() {
            return Err(ValidationError(errors));
        }

        // Bounds above keep every value inside the target integer types.
        Ok(Self {
            prompt: params.prompt.clone(),
            steps: steps as u32,
            seed: seed as u64,
            width: width as u32,
            height: height as u32,
            images: images as u32,
            guidance_scale,
            model,
            scheduler,
            negative_prompt: params.negative_prompt.clone(),
        })
    }

    /// Same request with a different seed, every other field untouched
    pub fn with_seed(&self, seed: u64) -> Self {
        Self {
            seed,
            ..self.clone()
        }
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn steps(&self) -> u32 {
        self.steps
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn images(&self) -> u32 {
        self.images
    }

    pub fn guidance_scale(&self) -> f64 {
        self.guidance_scale
    }

    pub fn model(&self) -> Option<ModelId> {
        self.model
    }

    pub fn scheduler(&self) -> Option<SchedulerId> {
        self.scheduler
    }

    pub fn negative_prompt(&self) -> Option<&str> {
        self.negative_prompt.as_deref()
    }
}

fn range_message<T: fmt::Display>(range: &std::ops::RangeInclusive<T>, value: T) -> String {
    format!(
        "must be between {} and {}, got {}",
        range.start(),
        range.end(),
        value
    )
}
