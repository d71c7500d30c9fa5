// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Repairs user supplied generation parameters before submission
//!
//! Width and height are snapped down to the unit grid before bound checks run,
//! so an input such as 500 becomes 448 and is accepted with a warning instead
//! of being rejected.

use rand::Rng;
use thiserror::Error;
use tracing::debug;

use super::types::{GenerationParams, GenerationRequest, ValidationError};
use crate::config::limits::{ParameterLimits, DEFAULT_IMAGE_SIZE, SEED_RANGE};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum NormalizeError {
    #[error("invalid generation parameters: {0}")]
    Validation(ValidationError),

    #[error("unexpected error while preparing the request: {0}")]
    Unknown(String),
}

/// Draw a seed uniformly from the full seed range
pub fn random_seed<R: Rng>(rng: &mut R) -> i64 {
    rng.gen_range(SEED_RANGE)
}

/// Draw a seed from the full range that differs from `current`
pub fn draw_new_seed<R: Rng>(rng: &mut R, current: u64) -> u64 {
    loop {
        let candidate = random_seed(rng);
        if candidate >= 0 && candidate as u64 != current {
            return candidate as u64;
        }
    }
}

/// Fill the seed, round width/height to the unit grid and validate.
///
/// Returns the request plus the advisory warnings produced by rounding: two
/// lines per rounded dimension, width before height.
pub fn normalize<R: Rng>(
    params: GenerationParams,
    limits: &ParameterLimits,
    rng: &mut R,
) -> Result<(GenerationRequest, Vec<String>), NormalizeError> {
    if limits.unit_size <= 0 {
        return Err(NormalizeError::Unknown(format!(
            "image unit size must be positive, got {}",
            limits.unit_size
        )));
    }

    let mut params = params;
    let mut warnings = Vec::new();

    if params.seed.is_none() {
        let seed = random_seed(rng);
        debug!("No seed supplied, drew {}", seed);
        params.seed = Some(seed);
    }

    let width = params.width.unwrap_or(DEFAULT_IMAGE_SIZE);
    params.width = Some(snap_dimension("width", width, limits, &mut warnings));

    let height = params.height.unwrap_or(DEFAULT_IMAGE_SIZE);
    params.height = Some(snap_dimension("height", height, limits, &mut warnings));

    let request =
        GenerationRequest::try_from_params(&params, limits).map_err(NormalizeError::Validation)?;
    Ok((request, warnings))
}

fn snap_dimension(
    name: &str,
    value: i64,
    limits: &ParameterLimits,
    warnings: &mut Vec<String>,
) -> i64 {
    let rounded = limits.round_to_unit(value);
    if rounded != value {
        warnings.push(format!("{} must be a multiple of {}", name, limits.unit_size));
        warnings.push(format!(
            "changed {} value from {} to {}",
            name, value, rounded
        ));
    }
    rounded
}
