// SPDX-FileCopyrightText: 2026 Reachback Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock follow-up API for pipeline testing.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use reachback_core::{AnalyzedCall, FollowupApi, MessageTemplate, ReachbackError};

/// A scriptable in-memory follow-up API.
///
/// Authenticated by default with an empty template set. Template fetches can
/// be failed or delayed; audit writes are captured for assertion and can be
/// failed independently.
pub struct MockApi {
    authenticated: AtomicBool,
    templates: Mutex<Vec<MessageTemplate>>,
    template_fetch_fails: AtomicBool,
    template_fetch_delay: Mutex<Option<Duration>>,
    record_call_fails: AtomicBool,
    record_message_fails: AtomicBool,
    recorded_calls: Mutex<Vec<AnalyzedCall>>,
    recorded_messages: Mutex<Vec<(String, String, i64)>>,
}

impl MockApi {
    /// Create an authenticated mock with no templates.
    pub fn new() -> Self {
        Self {
            authenticated: AtomicBool::new(true),
            templates: Mutex::new(Vec::new()),
            template_fetch_fails: AtomicBool::new(false),
            template_fetch_delay: Mutex::new(None),
            record_call_fails: AtomicBool::new(false),
            record_message_fails: AtomicBool::new(false),
            recorded_calls: Mutex::new(Vec::new()),
            recorded_messages: Mutex::new(Vec::new()),
        }
    }

    /// Toggle the authenticated-session flag.
    pub fn set_authenticated(&self, authenticated: bool) {
        self.authenticated.store(authenticated, Ordering::SeqCst);
    }

    /// Set the template list returned by `fetch_templates`.
    pub fn set_templates(&self, templates: Vec<MessageTemplate>) {
        *self.templates.lock().expect("lock poisoned") = templates;
    }

    /// Make every template fetch fail.
    pub fn fail_templates(&self) {
        self.template_fetch_fails.store(true, Ordering::SeqCst);
    }

    /// Delay every template fetch (for step-timeout tests).
    pub fn set_template_delay(&self, delay: Duration) {
        *self.template_fetch_delay.lock().expect("lock poisoned") = Some(delay);
    }

    /// Make every call-log write fail.
    pub fn fail_record_call(&self) {
        self.record_call_fails.store(true, Ordering::SeqCst);
    }

    /// Make every message-log write fail.
    pub fn fail_record_message(&self) {
        self.record_message_fails.store(true, Ordering::SeqCst);
    }

    /// All call-log writes captured so far.
    pub fn recorded_calls(&self) -> Vec<AnalyzedCall> {
        self.recorded_calls.lock().expect("lock poisoned").clone()
    }

    /// All message-log writes captured so far as `(number, message, timestamp)`.
    pub fn recorded_messages(&self) -> Vec<(String, String, i64)> {
        self.recorded_messages.lock().expect("lock poisoned").clone()
    }
}

impl Default for MockApi {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FollowupApi for MockApi {
    async fn is_authenticated(&self) -> bool {
        self.authenticated.load(Ordering::SeqCst)
    }

    async fn fetch_templates(
        &self,
        _role: &str,
    ) -> Result<Vec<MessageTemplate>, ReachbackError> {
        let delay = *self.template_fetch_delay.lock().expect("lock poisoned");
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.template_fetch_fails.load(Ordering::SeqCst) {
            return Err(ReachbackError::Api {
                message: "mock template fetch failure".into(),
                source: None,
            });
        }
        Ok(self.templates.lock().expect("lock poisoned").clone())
    }

    async fn record_call(&self, call: &AnalyzedCall) -> Result<(), ReachbackError> {
        if self.record_call_fails.load(Ordering::SeqCst) {
            return Err(ReachbackError::Api {
                message: "mock call-log failure".into(),
                source: None,
            });
        }
        self.recorded_calls
            .lock()
            .expect("lock poisoned")
            .push(call.clone());
        Ok(())
    }

    async fn record_message_sent(
        &self,
        number: &str,
        message: &str,
        timestamp_millis: i64,
    ) -> Result<(), ReachbackError> {
        if self.record_message_fails.load(Ordering::SeqCst) {
            return Err(ReachbackError::Api {
                message: "mock message-log failure".into(),
                source: None,
            });
        }
        self.recorded_messages
            .lock()
            .expect("lock poisoned")
            .push((number.to_string(), message.to_string(), timestamp_millis));
        Ok(())
    }
}
