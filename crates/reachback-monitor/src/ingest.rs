// SPDX-FileCopyrightText: 2026 Reachback Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ingest loop: raw record stream -> validated, deduplicated, filtered calls.
//!
//! Per raw blob: shape-validate, check the dedup window, classify, apply the
//! suppression filters (blacklist, minimum call duration, optional cooldown),
//! hand the call to the downstream sink, then record the pair in the window.
//! Every drop is silent at the user level and logged at debug.

use std::sync::Arc;
use std::time::Duration;

use reachback_config::model::MonitorConfig;
use reachback_core::{CallEventSource, CallKind, CallSink, ReachbackError, StateStore};
use reachback_store::MonitorSettings;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::classifier;
use crate::dedup::DedupWindow;

/// Consumes the raw call-event stream and drives the downstream sink.
pub struct IngestLoop {
    source: Arc<dyn CallEventSource>,
    sink: Arc<dyn CallSink>,
    store: Arc<dyn StateStore>,
    config: MonitorConfig,
    dedup: Mutex<DedupWindow>,
}

impl IngestLoop {
    /// Creates an ingest loop with a dedup window sized from the config.
    pub fn new(
        source: Arc<dyn CallEventSource>,
        sink: Arc<dyn CallSink>,
        store: Arc<dyn StateStore>,
        config: MonitorConfig,
    ) -> Self {
        let window = Duration::from_secs(config.effective_dedup_window_secs());
        Self {
            source,
            sink,
            store,
            config,
            dedup: Mutex::new(DedupWindow::new(window)),
        }
    }

    /// Runs the ingest loop until the cancellation token is triggered.
    pub async fn run(&self, cancel: CancellationToken) -> Result<(), ReachbackError> {
        info!("ingest loop running");

        loop {
            tokio::select! {
                record = self.source.next_record() => {
                    match record {
                        Ok(blob) => self.process_record(&blob).await,
                        Err(e) => {
                            error!(error = %e, "call source receive error");
                            // If the source stream is closed, break out of the loop.
                            if e.to_string().contains("closed") {
                                break;
                            }
                        }
                    }
                }
                _ = cancel.cancelled() => {
                    info!("shutdown signal received, stopping ingest loop");
                    break;
                }
            }
        }

        info!("ingest loop stopped");
        Ok(())
    }

    /// Processes one raw record blob end to end.
    ///
    /// Public so tests can drive the pipeline without a live source stream.
    pub async fn process_record(&self, blob: &serde_json::Value) {
        let Some(record) = classifier::parse_raw_record(blob) else {
            debug!("dropping malformed raw call record");
            return;
        };

        {
            let dedup = self.dedup.lock().await;
            if dedup.contains(&record.number, record.timestamp_millis) {
                debug!(
                    number = record.number.as_str(),
                    timestamp = record.timestamp_millis,
                    "dropping duplicate call event"
                );
                return;
            }
        }

        let call = classifier::classify(&record);
        let now_millis = chrono::Utc::now().timestamp_millis();

        match self.should_prompt(&call, now_millis).await {
            Ok(true) => {
                if let Err(e) = self.sink.on_call(call.clone()).await {
                    error!(error = %e, number = call.number.as_str(), "call sink failed");
                }
            }
            Ok(false) => {}
            Err(e) => {
                // A failed store read means the blacklist cannot be
                // consulted; suppress rather than risk prompting for an
                // excluded number.
                warn!(error = %e, "store read failed, suppressing prompt");
            }
        }

        self.dedup
            .lock()
            .await
            .record(&call.number, call.timestamp_millis, now_millis);
    }

    /// Applies the suppression filters to a classified call.
    async fn should_prompt(
        &self,
        call: &reachback_core::AnalyzedCall,
        now_millis: i64,
    ) -> Result<bool, ReachbackError> {
        if call.kind == CallKind::Unknown {
            debug!(number = call.number.as_str(), "skipping unknown call kind");
            return Ok(false);
        }

        if self.store.blacklist_contains(&call.number).await? {
            debug!(number = call.number.as_str(), "skipping blacklisted number");
            return Ok(false);
        }

        let settings = MonitorSettings::resolve(self.store.as_ref(), &self.config).await?;

        // Connected calls below the duration threshold are noise (wrong
        // numbers, instant hangups). Missed and rejected calls have zero
        // duration by nature and always qualify.
        if matches!(call.kind, CallKind::Incoming | CallKind::Outgoing)
            && call.duration_seconds < settings.min_call_duration_seconds
        {
            debug!(
                number = call.number.as_str(),
                duration = call.duration_seconds,
                "skipping call below minimum duration"
            );
            return Ok(false);
        }

        if self.config.enforce_cooldown
            && let Some(last) = self.store.last_sent(&call.number).await?
            && now_millis - last < settings.cooldown_millis()
        {
            debug!(
                number = call.number.as_str(),
                "skipping number inside cooldown window"
            );
            return Ok(false);
        }

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reachback_config::model::StorageConfig;
    use reachback_store::SqliteStateStore;
    use reachback_test_utils::{MockCallSink, MockCallSource};
    use serde_json::json;
    use tempfile::tempdir;

    async fn sqlite_store(dir: &tempfile::TempDir) -> Arc<SqliteStateStore> {
        let db_path = dir.path().join("ingest.db");
        let store = SqliteStateStore::new(StorageConfig {
            database_path: db_path.to_str().unwrap().to_string(),
            wal_mode: true,
        });
        store.initialize().await.unwrap();
        Arc::new(store)
    }

    fn ingest(
        store: Arc<SqliteStateStore>,
        sink: Arc<MockCallSink>,
        config: MonitorConfig,
    ) -> IngestLoop {
        IngestLoop::new(Arc::new(MockCallSource::new()), sink, store, config)
    }

    fn raw(number: &str, type_code: i64, duration: u32, ts: i64) -> serde_json::Value {
        json!({
            "number": number,
            "type": type_code,
            "durationSeconds": duration,
            "timestampMillis": ts
        })
    }

    #[tokio::test]
    async fn malformed_records_never_reach_the_sink() {
        let dir = tempdir().unwrap();
        let sink = Arc::new(MockCallSink::new());
        let loop_ = ingest(sqlite_store(&dir).await, sink.clone(), MonitorConfig::default());

        loop_.process_record(&json!({"type": 1})).await;
        loop_.process_record(&json!("not an object")).await;
        loop_
            .process_record(&json!({
                "number": "+1", "type": "x", "durationSeconds": 0, "timestampMillis": 1
            }))
            .await;

        assert_eq!(sink.calls().len(), 0);
    }

    #[tokio::test]
    async fn duplicate_events_reach_the_sink_once() {
        let dir = tempdir().unwrap();
        let sink = Arc::new(MockCallSink::new());
        let loop_ = ingest(sqlite_store(&dir).await, sink.clone(), MonitorConfig::default());

        let blob = raw("+911234567890", 3, 0, 1000);
        loop_.process_record(&blob).await;
        loop_.process_record(&blob).await;
        loop_.process_record(&blob).await;

        assert_eq!(sink.calls().len(), 1);

        // A different timestamp is a distinct event.
        loop_.process_record(&raw("+911234567890", 3, 0, 2000)).await;
        assert_eq!(sink.calls().len(), 2);
    }

    #[tokio::test]
    async fn blacklisted_numbers_never_prompt() {
        let dir = tempdir().unwrap();
        let store = sqlite_store(&dir).await;
        store.blacklist_add("+911234567890").await.unwrap();
        let sink = Arc::new(MockCallSink::new());
        let loop_ = ingest(store, sink.clone(), MonitorConfig::default());

        loop_.process_record(&raw("+911234567890", 3, 0, 1000)).await;
        assert_eq!(sink.calls().len(), 0);
    }

    #[tokio::test]
    async fn short_connected_calls_are_suppressed() {
        let dir = tempdir().unwrap();
        let config = MonitorConfig {
            min_call_duration_seconds: 10,
            ..MonitorConfig::default()
        };
        let sink = Arc::new(MockCallSink::new());
        let loop_ = ingest(sqlite_store(&dir).await, sink.clone(), config);

        // 5s incoming call: below threshold.
        loop_.process_record(&raw("+15550001", 1, 5, 1000)).await;
        assert_eq!(sink.calls().len(), 0);

        // 15s incoming call: qualifies.
        loop_.process_record(&raw("+15550001", 1, 15, 2000)).await;
        assert_eq!(sink.calls().len(), 1);

        // Missed call with zero duration always qualifies.
        loop_.process_record(&raw("+15550002", 3, 0, 3000)).await;
        assert_eq!(sink.calls().len(), 2);
    }

    #[tokio::test]
    async fn unknown_kind_never_prompts() {
        let dir = tempdir().unwrap();
        let sink = Arc::new(MockCallSink::new());
        let loop_ = ingest(sqlite_store(&dir).await, sink.clone(), MonitorConfig::default());

        loop_.process_record(&raw("+15550001", 42, 0, 1000)).await;
        assert_eq!(sink.calls().len(), 0);
    }

    #[tokio::test]
    async fn cooldown_suppresses_only_when_enforced() {
        let dir = tempdir().unwrap();
        let store = sqlite_store(&dir).await;
        let now = chrono::Utc::now().timestamp_millis();
        store.record_sent("+15550001", now).await.unwrap();

        // Enforcement off (default): a recent send does not suppress.
        let sink = Arc::new(MockCallSink::new());
        let loop_ = ingest(store.clone(), sink.clone(), MonitorConfig::default());
        loop_.process_record(&raw("+15550001", 3, 0, 1000)).await;
        assert_eq!(sink.calls().len(), 1);

        // Enforcement on: the same number is inside the cooldown window.
        let config = MonitorConfig {
            enforce_cooldown: true,
            ..MonitorConfig::default()
        };
        let sink = Arc::new(MockCallSink::new());
        let loop_ = ingest(store, sink.clone(), config);
        loop_.process_record(&raw("+15550001", 3, 0, 2000)).await;
        assert_eq!(sink.calls().len(), 0);
    }

    #[tokio::test]
    async fn classified_call_carries_record_fields() {
        let dir = tempdir().unwrap();
        let sink = Arc::new(MockCallSink::new());
        let loop_ = ingest(sqlite_store(&dir).await, sink.clone(), MonitorConfig::default());

        loop_.process_record(&raw("+911234567890", 1, 0, 1000)).await;
        let calls = sink.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].kind, CallKind::Missed);
        assert_eq!(calls[0].number, "+911234567890");
        assert_eq!(calls[0].timestamp_millis, 1000);
    }
}
