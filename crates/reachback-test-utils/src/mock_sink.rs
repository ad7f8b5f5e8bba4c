// SPDX-FileCopyrightText: 2026 Reachback Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock call sink capturing downstream call deliveries.

use std::sync::Mutex;

use async_trait::async_trait;

use reachback_core::{AnalyzedCall, CallSink, ReachbackError};

/// Captures every call delivered by the ingest loop.
pub struct MockCallSink {
    calls: Mutex<Vec<AnalyzedCall>>,
}

impl MockCallSink {
    /// Create a new sink with an empty capture list.
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
        }
    }

    /// All calls delivered so far, in order.
    pub fn calls(&self) -> Vec<AnalyzedCall> {
        self.calls.lock().expect("lock poisoned").clone()
    }
}

impl Default for MockCallSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CallSink for MockCallSink {
    async fn on_call(&self, call: AnalyzedCall) -> Result<(), ReachbackError> {
        self.calls.lock().expect("lock poisoned").push(call);
        Ok(())
    }
}
