// SPDX-FileCopyrightText: 2026 Reachback Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Downstream sink for newly observed, classified calls.

use async_trait::async_trait;

use crate::error::ReachbackError;
use crate::types::AnalyzedCall;

/// Consumer of validated, deduplicated, classified calls.
///
/// The ingest loop invokes this at most once per distinct call event.
#[async_trait]
pub trait CallSink: Send + Sync + 'static {
    /// Handles a newly observed call.
    async fn on_call(&self, call: AnalyzedCall) -> Result<(), ReachbackError>;
}
