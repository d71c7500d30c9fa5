// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Shared fakes: a scripted Job Service and a recording interaction surface

use async_trait::async_trait;
use fabstir_imagine_bot::bot::{InteractionSurface, Reply, SurfaceError};
use fabstir_imagine_bot::config::BotConfig;
use fabstir_imagine_bot::diffusion::client::JobResult;
use fabstir_imagine_bot::diffusion::{DiscordContext, JobService, RawErrorBody};
use fabstir_imagine_bot::ImageBot;
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const MODEL: &str = "http://model.test";
pub const UPSCALE: &str = "http://upscale.test";

pub fn images_url(task_id: &str) -> String {
    format!("{}/tasks/{}/images", MODEL, task_id)
}

pub fn params_url(task_id: &str) -> String {
    format!("{}/tasks/{}/params", MODEL, task_id)
}

pub fn tx_hash_url(task_id: &str) -> String {
    format!("{}/tasks/{}/tx-hash", MODEL, task_id)
}

pub fn upscale_result_url(task_id: &str) -> String {
    format!("{}/result/{}", UPSCALE, task_id)
}

/// Job Service fake. Each URL answers from its own queue; the last queued
/// answer repeats forever. Unscripted URLs answer 404.
#[derive(Default)]
pub struct ScriptedJobs {
    gets: Mutex<HashMap<String, VecDeque<JobResult>>>,
    posts: Mutex<HashMap<String, VecDeque<JobResult>>>,
    get_log: Mutex<Vec<String>>,
    post_log: Mutex<Vec<(String, Value)>>,
}

impl ScriptedJobs {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn on_get(&self, url: impl Into<String>, responses: Vec<JobResult>) {
        self.gets
            .lock()
            .unwrap()
            .entry(url.into())
            .or_default()
            .extend(responses);
    }

    /// Statuses for `url`, one GET each
    pub fn on_get_statuses(&self, url: impl Into<String>, statuses: &[&str]) {
        let responses = statuses
            .iter()
            .map(|s| Ok(json!({ "status": s })))
            .collect();
        self.on_get(url, responses);
    }

    pub fn on_post(&self, url: impl Into<String>, response: JobResult) {
        self.posts
            .lock()
            .unwrap()
            .entry(url.into())
            .or_default()
            .push_back(response);
    }

    pub fn get_count(&self, url: &str) -> usize {
        self.get_log.lock().unwrap().iter().filter(|u| *u == url).count()
    }

    pub fn posts(&self) -> Vec<(String, Value)> {
        self.post_log.lock().unwrap().clone()
    }

    fn answer(queues: &Mutex<HashMap<String, VecDeque<JobResult>>>, url: &str) -> JobResult {
        let mut queues = queues.lock().unwrap();
        match queues.get_mut(url) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap(),
            Some(queue) if !queue.is_empty() => queue[0].clone(),
            _ => Err(RawErrorBody {
                status: Some(404),
                body: "not found".to_string(),
            }),
        }
    }
}

#[async_trait]
impl JobService for ScriptedJobs {
    async fn post_json(&self, url: &str, body: &Value) -> JobResult {
        self.post_log
            .lock()
            .unwrap()
            .push((url.to_string(), body.clone()));
        Self::answer(&self.posts, url)
    }

    async fn get_json(&self, url: &str) -> JobResult {
        self.get_log.lock().unwrap().push(url.to_string());
        Self::answer(&self.gets, url)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Sent(Reply),
    Edited(Reply),
}

impl Event {
    pub fn reply(&self) -> &Reply {
        match self {
            Event::Sent(r) | Event::Edited(r) => r,
        }
    }
}

/// Surface that records every message and enforces send-once
pub struct RecordingSurface {
    responded: AtomicBool,
    events: Mutex<Vec<Event>>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self {
            responded: AtomicBool::new(false),
            events: Mutex::new(Vec::new()),
        }
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn sends(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, Event::Sent(_)))
            .count()
    }

    /// Edits produced by status changes
    pub fn status_edits(&self) -> Vec<String> {
        self.events()
            .iter()
            .filter_map(|e| match e {
                Event::Edited(r) => r.content.clone(),
                Event::Sent(_) => None,
            })
            .filter(|c| c.contains("status is updated"))
            .collect()
    }

    pub fn last(&self) -> Reply {
        self.events().last().expect("no message recorded").reply().clone()
    }
}

#[async_trait]
impl InteractionSurface for RecordingSurface {
    async fn send(&self, reply: Reply) -> Result<(), SurfaceError> {
        if self.responded.swap(true, Ordering::SeqCst) {
            return Err(SurfaceError::AlreadyResponded);
        }
        self.events.lock().unwrap().push(Event::Sent(reply));
        Ok(())
    }

    async fn edit(&self, reply: Reply) -> Result<(), SurfaceError> {
        if !self.responded.load(Ordering::SeqCst) {
            return Err(SurfaceError::NotResponded);
        }
        self.events.lock().unwrap().push(Event::Edited(reply));
        Ok(())
    }

    async fn context(&self) -> Result<DiscordContext, SurfaceError> {
        Ok(DiscordContext {
            user_id: "42".to_string(),
            guild_id: Some("7".to_string()),
            channel_id: "9".to_string(),
            message_id: Some("1001".to_string()),
        })
    }

    fn user_name(&self) -> String {
        "tester".to_string()
    }

    fn user_mention(&self) -> String {
        "<@42>".to_string()
    }
}

pub fn test_config() -> BotConfig {
    BotConfig {
        poll_interval: Duration::ZERO,
        tx_hash_max_steps: 3,
        ..BotConfig::new(MODEL, UPSCALE)
    }
}

pub fn bot(jobs: &Arc<ScriptedJobs>) -> ImageBot {
    ImageBot::new(test_config(), jobs.clone())
}

/// Completed payload with two images, the second one filtered
pub fn completed_payload() -> Value {
    json!({
        "status": "completed",
        "result": {
            "grid": { "url": "https://cdn.test/grid.png" },
            "1": { "url": "https://cdn.test/1.png", "origin_url": "https://cdn.test/1.png", "is_filtered": false },
            "2": { "url": "https://cdn.test/2-blur.png", "origin_url": "https://cdn.test/2.png", "is_filtered": true }
        }
    })
}

pub fn task_created(task_id: &str) -> JobResult {
    Ok(json!({ "task_id": task_id }))
}
