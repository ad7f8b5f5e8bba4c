// SPDX-FileCopyrightText: 2026 Reachback Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notification payload codec.
//!
//! The analyzed call rides inside the notification payload so the background
//! handler is self-contained: it needs nothing but the action event to act.
//! A discriminator tag guards against payloads from unrelated notifications.

use reachback_core::AnalyzedCall;
use serde::{Deserialize, Serialize};

/// Discriminator tag identifying client-check prompt payloads.
pub const PAYLOAD_TAG: &str = "client_check";

#[derive(Debug, Serialize, Deserialize)]
struct PromptPayload {
    tag: String,
    call: AnalyzedCall,
}

/// Serializes an analyzed call into an opaque payload string.
pub fn encode(call: &AnalyzedCall) -> String {
    let payload = PromptPayload {
        tag: PAYLOAD_TAG.to_string(),
        call: call.clone(),
    };
    // A struct of plain fields cannot fail to serialize.
    serde_json::to_string(&payload).unwrap_or_default()
}

/// Decodes a payload string back into an analyzed call.
///
/// Returns `None` for malformed JSON or a missing/foreign discriminator tag.
pub fn decode(raw: &str) -> Option<AnalyzedCall> {
    let payload: PromptPayload = serde_json::from_str(raw).ok()?;
    if payload.tag != PAYLOAD_TAG {
        return None;
    }
    Some(payload.call)
}
