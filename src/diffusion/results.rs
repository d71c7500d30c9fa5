// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Completed task payloads
//!
//! The Job Service keys images by 1-based strings ("1", "2", ...) next to a
//! "grid" entry. Internally the images are an ordered, 0-indexed list; the
//! string keys only exist at the parsing boundary.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResultSetError {
    #[error("result payload has no 'result' object")]
    MissingResult,

    #[error("result payload has no grid image")]
    MissingGrid,

    #[error("result payload contains no images")]
    NoImages,

    #[error("malformed entry '{key}': {reason}")]
    MalformedEntry { key: String, reason: String },
}

/// One generated image
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ResultItem {
    /// URL safe to show publicly
    pub url: String,
    /// Unfiltered image URL
    #[serde(default)]
    pub origin_url: Option<String>,
    #[serde(default)]
    pub is_filtered: bool,
}

impl ResultItem {
    /// URL shown when this single image is opened privately: the original when
    /// the public copy was filtered, the public copy otherwise.
    pub fn viewer_url(&self) -> &str {
        match (&self.origin_url, self.is_filtered) {
            (Some(origin), true) => origin,
            _ => &self.url,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GridEntry {
    url: String,
}

/// All images of a completed task plus the composite grid preview
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultSet {
    pub grid_url: String,
    pub items: Vec<ResultItem>,
}

impl ResultSet {
    /// Parse the `result` object of a completed task payload
    pub fn from_task_payload(payload: &Value) -> Result<Self, ResultSetError> {
        let result = payload
            .get("result")
            .filter(|r| r.is_object())
            .ok_or(ResultSetError::MissingResult)?;
        Self::from_result(result)
    }

    /// Parse a result map. Images are read from key "1" upwards until the
    /// first missing index, so the list is always dense.
    pub fn from_result(result: &Value) -> Result<Self, ResultSetError> {
        let grid = result.get("grid").ok_or(ResultSetError::MissingGrid)?;
        let grid: GridEntry =
            serde_json::from_value(grid.clone()).map_err(|e| ResultSetError::MalformedEntry {
                key: "grid".to_string(),
                reason: e.to_string(),
            })?;

        let mut items = Vec::new();
        loop {
            let key = (items.len() + 1).to_string();
            let Some(entry) = result.get(&key) else {
                break;
            };
            let item: ResultItem = serde_json::from_value(entry.clone())
                .map_err(|e| ResultSetError::MalformedEntry {
                    key: key.clone(),
                    reason: e.to_string(),
                })?;
            if item.is_filtered && item.origin_url.is_none() {
                return Err(ResultSetError::MalformedEntry {
                    key,
                    reason: "filtered image without origin_url".to_string(),
                });
            }
            items.push(item);
        }

        if items.is_empty() {
            return Err(ResultSetError::NoImages);
        }

        Ok(Self {
            grid_url: grid.url,
            items,
        })
    }

    pub fn any_filtered(&self) -> bool {
        self.items.iter().any(|item| item.is_filtered)
    }

    /// 1-based label used in buttons and titles
    pub fn label(index: usize) -> String {
        (index + 1).to_string()
    }
}
