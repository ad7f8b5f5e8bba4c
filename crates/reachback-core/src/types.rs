// SPDX-FileCopyrightText: 2026 Reachback Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across port traits and the Reachback daemon.

use serde::{Deserialize, Deserializer, Serialize};
use strum::{Display, EnumString};

/// Classified call direction/outcome produced by the call classifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CallKind {
    Incoming,
    Outgoing,
    Missed,
    Rejected,
    Unknown,
}

/// A raw call record after shape validation, before classification.
///
/// Produced from the untyped JSON blob the native call-log source emits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCallRecord {
    pub number: String,
    pub type_code: i64,
    pub duration_seconds: u32,
    pub timestamp_millis: i64,
}

/// A normalized, classified call event.
///
/// Immutable once produced. Serialized into the notification payload and
/// discarded after the prompt is resolved; never persisted standalone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzedCall {
    pub kind: CallKind,
    pub number: String,
    pub duration_seconds: u32,
    pub timestamp_millis: i64,
}

/// A follow-up message template fetched from the template endpoint.
///
/// Read-only from the daemon's perspective. `template_type` is kept as the
/// server's string form and compared against [`CallKind`]'s lowercase name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageTemplate {
    pub id: String,
    pub template_type: String,
    pub description: String,
    #[serde(deserialize_with = "de_primary_flag")]
    pub is_primary: bool,
}

/// Accepts `true`/`false`, `0`/`1`, and `"0"`/`"1"` for the primary flag.
///
/// The template endpoint has returned all three forms over its lifetime.
fn de_primary_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Bool(b) => Ok(b),
        serde_json::Value::Number(n) => Ok(n.as_i64() == Some(1)),
        serde_json::Value::String(s) => Ok(s == "1" || s.eq_ignore_ascii_case("true")),
        _ => Ok(false),
    }
}

/// Outbound messaging channel selected by the notification action.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ChannelKind {
    Whatsapp,
    Sms,
}

/// Action id for the "send via WhatsApp" notification button.
pub const ACTION_SEND_WHATSAPP: &str = "send_whatsapp";
/// Action id for the "send via SMS" notification button.
pub const ACTION_SEND_SMS: &str = "send_sms";
/// Action id for the "not a client" notification button.
pub const ACTION_NO_CLIENT: &str = "no_client";

/// Decoded notification action press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptAction {
    Send(ChannelKind),
    NotClient,
}

impl PromptAction {
    /// Maps a raw action id to a prompt action. Unrecognized ids (including a
    /// plain notification tap, which carries no action id) map to `None`.
    pub fn from_action_id(id: &str) -> Option<Self> {
        match id {
            ACTION_SEND_WHATSAPP => Some(PromptAction::Send(ChannelKind::Whatsapp)),
            ACTION_SEND_SMS => Some(PromptAction::Send(ChannelKind::Sms)),
            ACTION_NO_CLIENT => Some(PromptAction::NotClient),
            _ => None,
        }
    }
}

/// An action-press event delivered by the notification port.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionEvent {
    /// Id of the notification the press belongs to.
    pub notification_id: String,
    /// Pressed action id, or `None` for a plain tap on the notification body.
    pub action_id: Option<String>,
    /// Opaque payload attached to the notification at display time.
    pub payload: Option<String>,
}

/// A notification to be displayed by the notification port.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub channel_id: String,
    pub title: String,
    pub body: String,
    /// Opaque payload echoed back on action presses.
    pub payload: String,
    pub actions: Vec<NotificationAction>,
}

/// A single action button on a notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationAction {
    pub id: String,
    pub title: String,
}

/// Notification channel registration parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelSpec {
    pub id: String,
    pub name: String,
}

/// Call-log read permission state as reported by the permission gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PermissionStatus {
    Checking,
    Granted,
    Denied,
}

/// Identifies the kind of port adapter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterKind {
    CallSource,
    Notifier,
    Store,
    Api,
    Dispatcher,
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}
