// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Bounds applied to user supplied generation parameters

use std::ops::RangeInclusive;

pub const DEFAULT_STEPS: i64 = 45;
pub const DEFAULT_IMAGE_SIZE: i64 = 512;
pub const DEFAULT_IMAGES: i64 = 2;
pub const DEFAULT_GUIDANCE_SCALE: f64 = 7.5;

pub const STEPS_RANGE: RangeInclusive<i64> = 1..=100;
pub const SEED_RANGE: RangeInclusive<i64> = 0..=4_294_967_295;
pub const IMAGES_RANGE: RangeInclusive<i64> = 1..=4;
pub const GUIDANCE_SCALE_RANGE: RangeInclusive<f64> = 0.0..=50.0;

/// Maximum negative prompt length in characters
pub const MAX_NEGATIVE_PROMPT_LEN: usize = 1000;

/// Image size grid and bounds. Width and height share the same limits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParameterLimits {
    pub unit_size: i64,
    pub min_size: i64,
    pub max_size: i64,
}

impl ParameterLimits {
    pub fn size_range(&self) -> RangeInclusive<i64> {
        self.min_size..=self.max_size
    }

    /// Round `value` down to the nearest multiple of the unit size
    pub fn round_to_unit(&self, value: i64) -> i64 {
        value - value.rem_euclid(self.unit_size)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.unit_size <= 0 {
            return Err("image unit size must be greater than 0".to_string());
        }
        if self.min_size > self.max_size {
            return Err(format!(
                "image minimum size {} exceeds maximum size {}",
                self.min_size, self.max_size
            ));
        }
        Ok(())
    }
}

impl Default for ParameterLimits {
    fn default() -> Self {
        Self {
            unit_size: 64,
            min_size: 64,
            max_size: 1024,
        }
    }
}
