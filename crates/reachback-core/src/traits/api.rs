// SPDX-FileCopyrightText: 2026 Reachback Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Follow-up API trait for the template and audit-log REST endpoints.

use async_trait::async_trait;

use crate::error::ReachbackError;
use crate::types::{AnalyzedCall, MessageTemplate};

/// Port for the remote follow-up service.
///
/// Covers the three endpoints the background pipeline touches: template
/// fetch, call-log audit writes, and message-sent records. The session
/// check gates the whole pipeline — no session, no action.
#[async_trait]
pub trait FollowupApi: Send + Sync + 'static {
    /// Returns whether an authenticated session is currently present.
    async fn is_authenticated(&self) -> bool;

    /// Fetches the message templates for the given role.
    async fn fetch_templates(&self, role: &str)
        -> Result<Vec<MessageTemplate>, ReachbackError>;

    /// Writes a call record for audit purposes.
    async fn record_call(&self, call: &AnalyzedCall) -> Result<(), ReachbackError>;

    /// Records that a follow-up message was sent to a number.
    async fn record_message_sent(
        &self,
        number: &str,
        message: &str,
        timestamp_millis: i64,
    ) -> Result<(), ReachbackError>;
}
