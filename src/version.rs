// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Version information for the Fabstir Imagine bot

/// Full version string with feature description
pub const VERSION: &str = "v1.2.0-proof-links-2025-10-13";

/// Semantic version number
pub const VERSION_NUMBER: &str = "1.2.0";

/// Build date
pub const BUILD_DATE: &str = "2025-10-13";

/// Supported features in this version
pub const FEATURES: &[&str] = &[
    "generate",
    "size-rounding",
    "status-updates",
    "image-viewer",
    "upscale",
    "regenerate",
    "share-links",
    "tx-proof-links",
    "result-lookup",
];

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!("Fabstir Imagine Bot {} ({})", VERSION_NUMBER, BUILD_DATE)
}
