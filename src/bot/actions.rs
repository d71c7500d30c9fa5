// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Button actions and the registry that routes clicks back to them
//!
//! A rendered button carries only a custom id. The action it triggers is
//! stored here as data, so a click re-enters the bot with everything it needs
//! (for regenerate, the full request to resubmit).

use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use crate::diffusion::types::GenerationRequest;

/// Prefix of every custom id issued by the registry
pub const CUSTOM_ID_PREFIX: &str = "imagine:";

/// Registered actions kept before the oldest is evicted
pub const DEFAULT_CAPACITY: usize = 10_000;

#[derive(Debug, Clone, PartialEq)]
pub enum ButtonAction {
    /// Show one image privately, with an upscale button
    ViewImage {
        title: String,
        image_url: String,
        task_id: String,
    },
    /// Submit an image to the upscale service
    Upscale { title: String, image_url: String },
    /// Resubmit `request` with a fresh seed as a new invocation
    Regenerate { request: GenerationRequest },
}

/// In-memory map from button custom id to action
#[derive(Clone)]
pub struct ActionRegistry {
    actions: Arc<Mutex<LruCache<String, ButtonAction>>>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            actions: Arc::new(Mutex::new(LruCache::new(capacity))),
        }
    }

    /// Store `action` and return the custom id to put on its button
    pub async fn register(&self, action: ButtonAction) -> String {
        let custom_id = format!("{}{}", CUSTOM_ID_PREFIX, Uuid::new_v4());
        debug!("Registered button action {}", custom_id);
        self.actions.lock().await.put(custom_id.clone(), action);
        custom_id
    }

    pub async fn get(&self, custom_id: &str) -> Option<ButtonAction> {
        self.actions.lock().await.get(custom_id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.actions.lock().await.len()
    }

    pub fn owns(custom_id: &str) -> bool {
        custom_id.starts_with(CUSTOM_ID_PREFIX)
    }
}

impl Default for ActionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
