// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Job Service HTTP client
//!
//! Every call resolves to either the decoded JSON body (HTTP 200) or the raw
//! failure body. Nothing is retried here; the poller decides what to retry.

use anyhow::Result;
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use tracing::{debug, info, warn};

/// A non-200 response or a transport failure, body kept for diagnostics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawErrorBody {
    /// HTTP status, absent when the request never got a response
    pub status: Option<u16>,
    pub body: String,
}

impl RawErrorBody {
    pub fn new(status: Option<u16>, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

impl fmt::Display for RawErrorBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "job service returned {}: {}", status, self.body),
            None => write!(f, "job service unreachable: {}", self.body),
        }
    }
}

impl std::error::Error for RawErrorBody {}

pub type JobResult = std::result::Result<Value, RawErrorBody>;

/// Request/response contract of the remote Job Service
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JobService: Send + Sync {
    /// POST `body` as JSON to `url`
    async fn post_json(&self, url: &str, body: &Value) -> JobResult;

    /// GET `url`
    async fn get_json(&self, url: &str) -> JobResult;
}

/// reqwest backed [`JobService`]
pub struct JobServiceClient {
    client: Client,
}

impl JobServiceClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        info!("Job service client configured: timeout={:?}", timeout);
        Ok(Self { client })
    }

    async fn decode(response: reqwest::Response) -> JobResult {
        let status = response.status();
        if status != StatusCode::OK {
            let text = response.text().await.unwrap_or_default();
            warn!("Job service returned {}: {}", status, text);
            return Err(RawErrorBody::new(Some(status.as_u16()), text));
        }

        let text = response
            .text()
            .await
            .map_err(|e| RawErrorBody::new(Some(status.as_u16()), e.to_string()))?;
        serde_json::from_str(&text).map_err(|e| {
            warn!("Job service returned invalid JSON: {}", e);
            RawErrorBody::new(Some(status.as_u16()), text)
        })
    }
}

#[async_trait]
impl JobService for JobServiceClient {
    async fn post_json(&self, url: &str, body: &Value) -> JobResult {
        debug!("Job service POST {}", url);
        let response = self
            .client
            .post(url)
            .header(ACCEPT, "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| {
                warn!("Job service POST {} failed: {}", url, e);
                RawErrorBody::new(None, e.to_string())
            })?;
        Self::decode(response).await
    }

    async fn get_json(&self, url: &str) -> JobResult {
        debug!("Job service GET {}", url);
        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| {
                warn!("Job service GET {} failed: {}", url, e);
                RawErrorBody::new(None, e.to_string())
            })?;
        Self::decode(response).await
    }
}

/// Extract the `task_id` string of a submission response
pub fn task_id_of(payload: &Value) -> Option<String> {
    payload
        .get("task_id")
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}
