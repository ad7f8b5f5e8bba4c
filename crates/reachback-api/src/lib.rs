// SPDX-FileCopyrightText: 2026 Reachback Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the follow-up service REST endpoints.
//!
//! Provides [`RestApiClient`] which handles request construction, bearer
//! authentication, and transient error retry for the three endpoints the
//! background pipeline touches: template fetch, call-log writes, and
//! message-sent records.

use std::time::Duration;

use async_trait::async_trait;
use reachback_config::model::ApiConfig;
use reachback_core::{AnalyzedCall, FollowupApi, MessageTemplate, ReachbackError};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// Body for the call-log audit write.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CallLogBody<'a> {
    number: &'a str,
    call_type: String,
    duration_seconds: u32,
    timestamp_millis: i64,
}

/// Body for the message-sent record.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MessageLogBody<'a> {
    contact_number: &'a str,
    message_sent: &'a str,
    timestamp: i64,
}

/// HTTP client for the follow-up service.
///
/// Manages the bearer session token, connection pooling, and retry logic
/// for transient errors (429, 500, 503).
pub struct RestApiClient {
    client: reqwest::Client,
    base_url: String,
    role: String,
    max_retries: u32,
    session_token: RwLock<Option<String>>,
}

impl RestApiClient {
    /// Creates a new follow-up service client from configuration.
    pub fn new(config: &ApiConfig) -> Result<Self, ReachbackError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| ReachbackError::Api {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            role: config.role.clone(),
            max_retries: 1,
            session_token: RwLock::new(config.session_token.clone()),
        })
    }

    /// Returns the role whose templates are fetched.
    pub fn role(&self) -> &str {
        &self.role
    }

    /// Installs a session token (e.g. after login).
    pub async fn set_session_token(&self, token: String) {
        *self.session_token.write().await = Some(token);
    }

    /// Clears the session token (e.g. after logout).
    pub async fn clear_session_token(&self) {
        *self.session_token.write().await = None;
    }

    /// Sends one request with bearer auth and a single transient retry.
    async fn send_with_retry(
        &self,
        build: impl Fn() -> reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, ReachbackError> {
        let token = self.session_token.read().await.clone();
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                warn!(attempt, "retrying request after transient error");
                tokio::time::sleep(Duration::from_secs(1)).await;
            }

            let mut req = build();
            if let Some(ref token) = token {
                req = req.bearer_auth(token);
            }

            let response = req.send().await.map_err(|e| ReachbackError::Api {
                message: format!("HTTP request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

            let status = response.status();
            debug!(status = %status, attempt, "response received");

            if status.is_success() {
                return Ok(response);
            }

            if is_transient_error(status) && attempt < self.max_retries {
                let body = response.text().await.unwrap_or_default();
                warn!(status = %status, body = %body, "transient error, will retry");
                last_error = Some(ReachbackError::Api {
                    message: format!("API returned {status}: {body}"),
                    source: None,
                });
                continue;
            }

            // Non-transient error or exhausted retries.
            let body = response.text().await.unwrap_or_default();
            return Err(ReachbackError::Api {
                message: format!("API returned {status}: {body}"),
                source: None,
            });
        }

        Err(last_error.unwrap_or_else(|| ReachbackError::Api {
            message: "request failed after retries".into(),
            source: None,
        }))
    }
}

#[async_trait]
impl FollowupApi for RestApiClient {
    async fn is_authenticated(&self) -> bool {
        self.session_token.read().await.is_some()
    }

    async fn fetch_templates(
        &self,
        role: &str,
    ) -> Result<Vec<MessageTemplate>, ReachbackError> {
        let url = format!("{}/templates", self.base_url);
        let role = role.to_string();
        let response = self
            .send_with_retry(|| self.client.get(&url).query(&[("role", role.as_str())]))
            .await?;

        let body = response.text().await.map_err(|e| ReachbackError::Api {
            message: format!("failed to read template response body: {e}"),
            source: Some(Box::new(e)),
        })?;
        let templates: Vec<MessageTemplate> =
            serde_json::from_str(&body).map_err(|e| ReachbackError::Api {
                message: format!("failed to parse template response: {e}"),
                source: Some(Box::new(e)),
            })?;

        debug!(count = templates.len(), "templates fetched");
        Ok(templates)
    }

    async fn record_call(&self, call: &AnalyzedCall) -> Result<(), ReachbackError> {
        let url = format!("{}/call-logs", self.base_url);
        let body = CallLogBody {
            number: &call.number,
            call_type: call.kind.to_string(),
            duration_seconds: call.duration_seconds,
            timestamp_millis: call.timestamp_millis,
        };
        self.send_with_retry(|| self.client.post(&url).json(&body))
            .await?;
        Ok(())
    }

    async fn record_message_sent(
        &self,
        number: &str,
        message: &str,
        timestamp_millis: i64,
    ) -> Result<(), ReachbackError> {
        let url = format!("{}/message-logs", self.base_url);
        let body = MessageLogBody {
            contact_number: number,
            message_sent: message,
            timestamp: timestamp_millis,
        };
        self.send_with_retry(|| self.client.post(&url).json(&body))
            .await?;
        Ok(())
    }
}

/// Returns true for HTTP status codes that indicate transient errors worth retrying.
fn is_transient_error(status: reqwest::StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 500 | 503)
}
