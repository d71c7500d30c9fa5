// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! URL layout of the generation and upscale services

use url::{form_urlencoded, Url};

/// Builds every Job Service URL the bot talks to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobEndpoints {
    model_endpoint: String,
    upscale_endpoint: String,
}

impl JobEndpoints {
    pub fn new(model_endpoint: &str, upscale_endpoint: &str) -> Self {
        Self {
            model_endpoint: model_endpoint.trim_end_matches('/').to_string(),
            upscale_endpoint: upscale_endpoint.trim_end_matches('/').to_string(),
        }
    }

    /// POST target for new generation tasks
    pub fn generate(&self) -> String {
        format!("{}/generate", self.model_endpoint)
    }

    pub fn task_images(&self, task_id: &str) -> String {
        join_segments(&self.model_endpoint, &["tasks", task_id, "images"])
    }

    pub fn task_params(&self, task_id: &str) -> String {
        join_segments(&self.model_endpoint, &["tasks", task_id, "params"])
    }

    pub fn task_tx_hash(&self, task_id: &str) -> String {
        join_segments(&self.model_endpoint, &["tasks", task_id, "tx-hash"])
    }

    /// POST target for upscaling the image at `image_url`, query-encoded
    pub fn upscale(&self, image_url: &str) -> String {
        let base = format!("{}/upscale/url", self.upscale_endpoint);
        match Url::parse_with_params(&base, &[("url", image_url)]) {
            Ok(url) => url.to_string(),
            Err(_) => format!("{}?url={}", base, image_url),
        }
    }

    pub fn upscale_result(&self, task_id: &str) -> String {
        join_segments(&self.upscale_endpoint, &["result", task_id])
    }
}

/// Append `segments` to `base`, each percent-encoded as exactly one path
/// segment so a task id can never address another route.
fn join_segments(base: &str, segments: &[&str]) -> String {
    match Url::parse(base) {
        Ok(mut url) => {
            if let Ok(mut path) = url.path_segments_mut() {
                path.pop_if_empty().extend(segments);
            }
            url.to_string()
        }
        Err(_) => {
            let encoded: Vec<String> = segments
                .iter()
                .map(|s| form_urlencoded::byte_serialize(s.as_bytes()).collect())
                .collect();
            format!("{}/{}", base, encoded.join("/"))
        }
    }
}
