// SPDX-FileCopyrightText: 2026 Reachback Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Stdio host bridge.
//!
//! The native side (call log, permissions, notifications) lives in a host
//! process that speaks newline-delimited JSON over the daemon's stdio:
//!
//! Inbound lines:
//! - `{"event":"call","record":{...}}` — a raw call record blob
//! - `{"event":"action","notificationId":"...","actionId":"...","payload":"..."}`
//! - `{"event":"permission","granted":true}` — reply to a permission query
//!
//! Outbound lines:
//! - `{"event":"channel","id":"...","name":"..."}` — register channel
//! - `{"event":"display","notification":{...}}` / `{"event":"cancel","id":"..."}`
//! - `{"event":"start_monitoring"}` / `{"event":"stop_monitoring"}`
//! - `{"event":"check_permission"}` / `{"event":"request_permission"}` /
//!   `{"event":"open_settings"}`
//!
//! Deep links are opened directly via the platform opener binary.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use reachback_core::{
    ActionEvent, Adapter, AdapterKind, CallEventSource, ChannelSpec, HealthStatus, LinkOpener,
    Notification, Notifier, PermissionGate, PermissionStatus, ReachbackError,
};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::{Mutex, Notify};
use tracing::{debug, warn};

/// Queues shared between the reader task and the port adapters.
pub struct BridgeInner {
    calls: Mutex<VecDeque<serde_json::Value>>,
    call_notify: Notify,
    actions: Mutex<VecDeque<ActionEvent>>,
    action_notify: Notify,
    permissions: Mutex<VecDeque<bool>>,
    permission_notify: Notify,
}

impl BridgeInner {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(VecDeque::new()),
            call_notify: Notify::new(),
            actions: Mutex::new(VecDeque::new()),
            action_notify: Notify::new(),
            permissions: Mutex::new(VecDeque::new()),
            permission_notify: Notify::new(),
        })
    }

    /// Demuxes one inbound line into the matching queue.
    pub async fn ingest_line(&self, line: &str) {
        let Ok(value) = serde_json::from_str::<serde_json::Value>(line) else {
            warn!(line, "ignoring unparseable bridge line");
            return;
        };
        match value.get("event").and_then(|e| e.as_str()) {
            Some("call") => {
                if let Some(record) = value.get("record") {
                    self.calls.lock().await.push_back(record.clone());
                    self.call_notify.notify_one();
                }
            }
            Some("action") => {
                let event = ActionEvent {
                    notification_id: value
                        .get("notificationId")
                        .and_then(|v| v.as_str())
                        .unwrap_or_default()
                        .to_string(),
                    action_id: value
                        .get("actionId")
                        .and_then(|v| v.as_str())
                        .map(String::from),
                    payload: value
                        .get("payload")
                        .and_then(|v| v.as_str())
                        .map(String::from),
                };
                self.actions.lock().await.push_back(event);
                self.action_notify.notify_one();
            }
            Some("permission") => {
                let granted = value
                    .get("granted")
                    .and_then(|v| v.as_bool())
                    .unwrap_or(false);
                self.permissions.lock().await.push_back(granted);
                self.permission_notify.notify_one();
            }
            other => {
                debug!(event = ?other, "ignoring unknown bridge event");
            }
        }
    }

    /// Spawns the stdin reader task feeding the queues.
    pub fn spawn_stdin_reader(self: &Arc<Self>) -> tokio::task::JoinHandle<()> {
        let inner = Arc::clone(self);
        tokio::spawn(async move {
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                if line.trim().is_empty() {
                    continue;
                }
                inner.ingest_line(&line).await;
            }
            debug!("bridge stdin closed");
        })
    }
}

/// Serializes outbound bridge lines onto stdout.
pub struct BridgeWriter {
    out: Mutex<tokio::io::Stdout>,
}

impl BridgeWriter {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            out: Mutex::new(tokio::io::stdout()),
        })
    }

    async fn send(&self, value: serde_json::Value) -> Result<(), ReachbackError> {
        let mut line = value.to_string();
        line.push('\n');
        let mut out = self.out.lock().await;
        out.write_all(line.as_bytes())
            .await
            .map_err(map_write_err)?;
        out.flush().await.map_err(map_write_err)?;
        Ok(())
    }
}

fn map_write_err(e: std::io::Error) -> ReachbackError {
    ReachbackError::Notify {
        message: format!("bridge write failed: {e}"),
        source: Some(Box::new(e)),
    }
}

/// Call-event source backed by the stdio bridge.
pub struct BridgeCallSource {
    inner: Arc<BridgeInner>,
    writer: Arc<BridgeWriter>,
}

impl BridgeCallSource {
    pub fn new(inner: Arc<BridgeInner>, writer: Arc<BridgeWriter>) -> Self {
        Self { inner, writer }
    }
}

#[async_trait]
impl Adapter for BridgeCallSource {
    fn name(&self) -> &str {
        "stdio-bridge"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn kind(&self) -> AdapterKind {
        AdapterKind::CallSource
    }

    async fn health_check(&self) -> Result<HealthStatus, ReachbackError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), ReachbackError> {
        Ok(())
    }
}

#[async_trait]
impl CallEventSource for BridgeCallSource {
    async fn start(&self) -> Result<(), ReachbackError> {
        self.writer
            .send(serde_json::json!({"event": "start_monitoring"}))
            .await
    }

    async fn stop(&self) -> Result<(), ReachbackError> {
        self.writer
            .send(serde_json::json!({"event": "stop_monitoring"}))
            .await
    }

    async fn next_record(&self) -> Result<serde_json::Value, ReachbackError> {
        loop {
            {
                let mut queue = self.inner.calls.lock().await;
                if let Some(record) = queue.pop_front() {
                    return Ok(record);
                }
            }
            self.inner.call_notify.notified().await;
        }
    }
}

/// Notifier backed by the stdio bridge.
pub struct BridgeNotifier {
    inner: Arc<BridgeInner>,
    writer: Arc<BridgeWriter>,
}

impl BridgeNotifier {
    pub fn new(inner: Arc<BridgeInner>, writer: Arc<BridgeWriter>) -> Self {
        Self { inner, writer }
    }
}

#[async_trait]
impl Adapter for BridgeNotifier {
    fn name(&self) -> &str {
        "stdio-bridge"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn kind(&self) -> AdapterKind {
        AdapterKind::Notifier
    }

    async fn health_check(&self) -> Result<HealthStatus, ReachbackError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), ReachbackError> {
        Ok(())
    }
}

#[async_trait]
impl Notifier for BridgeNotifier {
    async fn ensure_channel(&self, spec: &ChannelSpec) -> Result<(), ReachbackError> {
        self.writer
            .send(serde_json::json!({
                "event": "channel",
                "id": spec.id,
                "name": spec.name,
            }))
            .await
    }

    async fn display(&self, notification: Notification) -> Result<(), ReachbackError> {
        self.writer
            .send(serde_json::json!({
                "event": "display",
                "notification": notification,
            }))
            .await
    }

    async fn cancel(&self, id: &str) -> Result<(), ReachbackError> {
        self.writer
            .send(serde_json::json!({"event": "cancel", "id": id}))
            .await
    }

    async fn next_action(&self) -> Result<ActionEvent, ReachbackError> {
        loop {
            {
                let mut queue = self.inner.actions.lock().await;
                if let Some(event) = queue.pop_front() {
                    return Ok(event);
                }
            }
            self.inner.action_notify.notified().await;
        }
    }
}

/// Permission gate backed by the stdio bridge.
pub struct BridgePermissionGate {
    inner: Arc<BridgeInner>,
    writer: Arc<BridgeWriter>,
}

impl BridgePermissionGate {
    pub fn new(inner: Arc<BridgeInner>, writer: Arc<BridgeWriter>) -> Self {
        Self { inner, writer }
    }

    async fn await_grant(&self) -> bool {
        loop {
            {
                let mut queue = self.inner.permissions.lock().await;
                if let Some(granted) = queue.pop_front() {
                    return granted;
                }
            }
            self.inner.permission_notify.notified().await;
        }
    }
}

#[async_trait]
impl PermissionGate for BridgePermissionGate {
    async fn check(&self) -> Result<PermissionStatus, ReachbackError> {
        self.writer
            .send(serde_json::json!({"event": "check_permission"}))
            .await?;
        Ok(if self.await_grant().await {
            PermissionStatus::Granted
        } else {
            PermissionStatus::Denied
        })
    }

    async fn request(&self) -> Result<bool, ReachbackError> {
        self.writer
            .send(serde_json::json!({"event": "request_permission"}))
            .await?;
        Ok(self.await_grant().await)
    }

    async fn open_settings(&self) {
        if let Err(e) = self
            .writer
            .send(serde_json::json!({"event": "open_settings"}))
            .await
        {
            warn!(error = %e, "failed to request system settings prompt");
        }
    }
}

/// Opens deep links via the platform opener binary.
pub struct ExecOpener;

#[cfg(target_os = "macos")]
const OPENER: &str = "open";
#[cfg(not(target_os = "macos"))]
const OPENER: &str = "xdg-open";

#[async_trait]
impl LinkOpener for ExecOpener {
    async fn can_open(&self, _uri: &str) -> bool {
        // The platform opener resolves handlers itself; failures surface
        // through `open` and take the dispatcher's fallback path.
        true
    }

    async fn open(&self, uri: &str) -> Result<(), ReachbackError> {
        let status = tokio::process::Command::new(OPENER)
            .arg(uri)
            .status()
            .await
            .map_err(|e| ReachbackError::Dispatch {
                message: format!("failed to spawn {OPENER}: {e}"),
                source: Some(Box::new(e)),
            })?;

        if !status.success() {
            return Err(ReachbackError::Dispatch {
                message: format!("{OPENER} exited with {status} for {uri}"),
                source: None,
            });
        }
        Ok(())
    }
}
