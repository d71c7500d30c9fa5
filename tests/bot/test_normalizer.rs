// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use fabstir_imagine_bot::config::ParameterLimits;
use fabstir_imagine_bot::diffusion::{normalize, GenerationParams, NormalizeError};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn test_every_accepted_width_is_aligned_and_not_larger() {
    let limits = ParameterLimits::default();
    let mut rng = StdRng::seed_from_u64(11);

    for width in limits.min_size..=limits.max_size {
        let params = GenerationParams {
            width: Some(width),
            ..GenerationParams::new("a lighthouse")
        };
        let (request, warnings) = normalize(params, &limits, &mut rng).unwrap();
        let normalized = request.width() as i64;

        assert_eq!(normalized % limits.unit_size, 0, "width {}", width);
        assert!(normalized <= width);
        assert_eq!(warnings.is_empty(), normalized == width, "width {}", width);
    }
}

#[test]
fn test_out_of_range_sizes_reported_per_field() {
    let limits = ParameterLimits::default();
    let params = GenerationParams {
        width: Some(2000),
        height: Some(10),
        guidance_scale: Some(80.0),
        ..GenerationParams::new("a lighthouse")
    };

    let err = normalize(params, &limits, &mut StdRng::seed_from_u64(1)).unwrap_err();
    let NormalizeError::Validation(validation) = err else {
        panic!("expected validation error, got {:?}", err);
    };
    assert_eq!(validation.fields(), vec!["width", "height", "guidance_scale"]);
}

#[test]
fn test_supplied_seed_is_kept() {
    let params = GenerationParams {
        seed: Some(1234),
        ..GenerationParams::new("a lighthouse")
    };
    let (request, _) = normalize(
        params,
        &ParameterLimits::default(),
        &mut StdRng::seed_from_u64(1),
    )
    .unwrap();
    assert_eq!(request.seed(), 1234);
}
