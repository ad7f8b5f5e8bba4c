// SPDX-FileCopyrightText: 2026 Reachback Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock notifier for deterministic testing.
//!
//! `MockNotifier` implements `Notifier` with captured display/cancel calls
//! and injectable action-press events.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex as StdMutex};

use async_trait::async_trait;
use tokio::sync::{Mutex, Notify};

use reachback_core::{
    ActionEvent, Adapter, AdapterKind, ChannelSpec, HealthStatus, Notification, Notifier,
    ReachbackError,
};

/// A mock notification port for testing.
///
/// Captures every channel registration, displayed notification, and
/// cancellation; action events injected via `inject_action()` are returned
/// by `next_action()`.
pub struct MockNotifier {
    channels: StdMutex<Vec<ChannelSpec>>,
    displayed: StdMutex<Vec<Notification>>,
    cancelled: StdMutex<Vec<String>>,
    actions: Arc<Mutex<VecDeque<ActionEvent>>>,
    notify: Arc<Notify>,
}

impl MockNotifier {
    /// Create a new mock notifier with empty capture lists.
    pub fn new() -> Self {
        Self {
            channels: StdMutex::new(Vec::new()),
            displayed: StdMutex::new(Vec::new()),
            cancelled: StdMutex::new(Vec::new()),
            actions: Arc::new(Mutex::new(VecDeque::new())),
            notify: Arc::new(Notify::new()),
        }
    }

    /// Inject an action-press event into the queue.
    pub async fn inject_action(&self, event: ActionEvent) {
        self.actions.lock().await.push_back(event);
        self.notify.notify_one();
    }

    /// All channel registrations seen so far.
    pub fn channels(&self) -> Vec<ChannelSpec> {
        self.channels.lock().expect("lock poisoned").clone()
    }

    /// All notifications passed to `display()`.
    pub fn displayed(&self) -> Vec<Notification> {
        self.displayed.lock().expect("lock poisoned").clone()
    }

    /// All notification ids passed to `cancel()`.
    pub fn cancelled(&self) -> Vec<String> {
        self.cancelled.lock().expect("lock poisoned").clone()
    }

    /// Whether a notification id has been displayed and not yet cancelled.
    pub fn is_active(&self, id: &str) -> bool {
        let shown = self
            .displayed
            .lock()
            .expect("lock poisoned")
            .iter()
            .any(|n| n.id == id);
        let cancelled = self
            .cancelled
            .lock()
            .expect("lock poisoned")
            .iter()
            .any(|c| c == id);
        shown && !cancelled
    }
}

impl Default for MockNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Adapter for MockNotifier {
    fn name(&self) -> &str {
        "mock-notifier"
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
impl Notifier for MockNotifier {
    async fn ensure_channel(&self, spec: &ChannelSpec) -> Result<(), ReachbackError> {
        self.channels.lock().expect("lock poisoned").push(spec.clone());
        Ok(())
    }

    async fn display(&self, notification: Notification) -> Result<(), ReachbackError> {
        self.displayed
            .lock()
            .expect("lock poisoned")
            .push(notification);
        Ok(())
    }

    async fn cancel(&self, id: &str) -> Result<(), ReachbackError> {
        self.cancelled
            .lock()
            .expect("lock poisoned")
            .push(id.to_string());
        Ok(())
    }

    async fn next_action(&self) -> Result<ActionEvent, ReachbackError> {
        loop {
            {
                let mut queue = self.actions.lock().await;
                if let Some(event) = queue.pop_front() {
                    return Ok(event);
                }
            }
            self.notify.notified().await;
        }
    }
}
