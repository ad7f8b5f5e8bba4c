// SPDX-FileCopyrightText: 2026 Reachback Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock call-event source for deterministic testing.
//!
//! `MockCallSource` implements `CallEventSource` with injectable raw record
//! blobs and counters for native start/stop invocations.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, Notify};

use reachback_core::{
    Adapter, AdapterKind, CallEventSource, HealthStatus, ReachbackError,
};

/// A mock native call-log source for testing.
///
/// Records injected via `inject_record()` are returned by `next_record()`.
/// `start()`/`stop()` invocations are counted so lifecycle tests can assert
/// exactly-once semantics, and the next invocation of either can be made to
/// fail.
pub struct MockCallSource {
    inbound: Arc<Mutex<VecDeque<serde_json::Value>>>,
    notify: Arc<Notify>,
    starts: AtomicUsize,
    stops: AtomicUsize,
    fail_start: AtomicBool,
    fail_stop: AtomicBool,
}

impl MockCallSource {
    /// Create a new mock source with an empty record queue.
    pub fn new() -> Self {
        Self {
            inbound: Arc::new(Mutex::new(VecDeque::new())),
            notify: Arc::new(Notify::new()),
            starts: AtomicUsize::new(0),
            stops: AtomicUsize::new(0),
            fail_start: AtomicBool::new(false),
            fail_stop: AtomicBool::new(false),
        }
    }

    /// Inject a raw record blob into the event queue.
    pub async fn inject_record(&self, record: serde_json::Value) {
        self.inbound.lock().await.push_back(record);
        self.notify.notify_one();
    }

    /// Number of times `start()` was invoked.
    pub fn start_count(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }

    /// Number of times `stop()` was invoked.
    pub fn stop_count(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }

    /// Make the next `start()` invocation fail.
    pub fn fail_next_start(&self) {
        self.fail_start.store(true, Ordering::SeqCst);
    }

    /// Make the next `stop()` invocation fail.
    pub fn fail_next_stop(&self) {
        self.fail_stop.store(true, Ordering::SeqCst);
    }
}

impl Default for MockCallSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Adapter for MockCallSource {
    fn name(&self) -> &str {
        "mock-call-source"
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
impl CallEventSource for MockCallSource {
    async fn start(&self) -> Result<(), ReachbackError> {
        if self.fail_start.swap(false, Ordering::SeqCst) {
            return Err(ReachbackError::Internal("mock start failure".into()));
        }
        self.starts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn stop(&self) -> Result<(), ReachbackError> {
        if self.fail_stop.swap(false, Ordering::SeqCst) {
            return Err(ReachbackError::Internal("mock stop failure".into()));
        }
        self.stops.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn next_record(&self) -> Result<serde_json::Value, ReachbackError> {
        loop {
            {
                let mut queue = self.inbound.lock().await;
                if let Some(record) = queue.pop_front() {
                    return Ok(record);
                }
            }
            self.notify.notified().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn next_record_returns_injected_records_in_order() {
        let source = MockCallSource::new();
        source.inject_record(json!({"n": 1})).await;
        source.inject_record(json!({"n": 2})).await;

        assert_eq!(source.next_record().await.unwrap(), json!({"n": 1}));
        assert_eq!(source.next_record().await.unwrap(), json!({"n": 2}));
    }

    #[tokio::test]
    async fn start_and_stop_are_counted() {
        let source = MockCallSource::new();
        source.start().await.unwrap();
        source.start().await.unwrap();
        source.stop().await.unwrap();
        assert_eq!(source.start_count(), 2);
        assert_eq!(source.stop_count(), 1);
    }

    #[tokio::test]
    async fn fail_next_start_fails_once() {
        let source = MockCallSource::new();
        source.fail_next_start();
        assert!(source.start().await.is_err());
        assert!(source.start().await.is_ok());
        assert_eq!(source.start_count(), 1);
    }
}
