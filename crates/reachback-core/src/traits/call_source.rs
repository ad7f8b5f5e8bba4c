// SPDX-FileCopyrightText: 2026 Reachback Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Call-event source trait for the native call-log bridge.

use async_trait::async_trait;

use crate::error::ReachbackError;
use crate::traits::adapter::Adapter;

/// Port for the native call-log event source.
///
/// Emits untyped raw call records; shape validation and classification
/// happen downstream in the monitor. `start`/`stop` control the underlying
/// host listener and may be called from the lifecycle state machine only.
#[async_trait]
pub trait CallEventSource: Adapter {
    /// Starts the native call-log listener.
    async fn start(&self) -> Result<(), ReachbackError>;

    /// Stops the native call-log listener.
    async fn stop(&self) -> Result<(), ReachbackError>;

    /// Receives the next raw call record blob from the host.
    async fn next_record(&self) -> Result<serde_json::Value, ReachbackError>;
}
