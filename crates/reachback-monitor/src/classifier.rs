// SPDX-FileCopyrightText: 2026 Reachback Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Raw call record validation and classification.
//!
//! The native call-log source emits untyped JSON blobs. [`parse_raw_record`]
//! is the shape filter: records missing a field or carrying the wrong
//! primitive type are dropped silently — they are noise, not errors.
//! [`classify`] is the deterministic, side-effect-free mapping from platform
//! type codes to [`CallKind`].

use reachback_core::{AnalyzedCall, CallKind, RawCallRecord};

/// Platform code for an incoming (answered or ringing) call.
const CODE_INCOMING: i64 = 1;
/// Platform code for an outgoing call.
const CODE_OUTGOING: i64 = 2;
/// Platform code for a missed call.
const CODE_MISSED: i64 = 3;
/// Platform code for a rejected call.
const CODE_REJECTED: i64 = 5;

/// Validates the shape of a raw call record blob.
///
/// Requires exactly the four expected fields with the expected primitive
/// types: a non-empty string `number`, an integer `type`, and non-negative
/// integers `durationSeconds` and `timestampMillis`. Returns `None` for
/// anything else.
pub fn parse_raw_record(value: &serde_json::Value) -> Option<RawCallRecord> {
    let obj = value.as_object()?;

    let number = obj.get("number")?.as_str()?;
    if number.is_empty() {
        return None;
    }

    let type_code = obj.get("type")?.as_i64()?;

    let duration = obj.get("durationSeconds")?.as_i64()?;
    if duration < 0 {
        return None;
    }
    let duration_seconds = u32::try_from(duration).ok()?;

    let timestamp_millis = obj.get("timestampMillis")?.as_i64()?;
    if timestamp_millis < 0 {
        return None;
    }

    Some(RawCallRecord {
        number: number.to_string(),
        type_code,
        duration_seconds,
        timestamp_millis,
    })
}

/// Classifies a validated raw record into an [`AnalyzedCall`].
///
/// Code 1 is `incoming` only when the call actually connected (duration
/// above zero); a zero-duration code 1 is a missed call.
pub fn classify(record: &RawCallRecord) -> AnalyzedCall {
    let kind = match record.type_code {
        CODE_INCOMING if record.duration_seconds > 0 => CallKind::Incoming,
        CODE_INCOMING => CallKind::Missed,
        CODE_OUTGOING => CallKind::Outgoing,
        CODE_MISSED => CallKind::Missed,
        CODE_REJECTED => CallKind::Rejected,
        _ => CallKind::Unknown,
    };

    AnalyzedCall {
        kind,
        number: record.number.clone(),
        duration_seconds: record.duration_seconds,
        timestamp_millis: record.timestamp_millis,
    }
}
