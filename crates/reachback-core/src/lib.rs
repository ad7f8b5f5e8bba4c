// SPDX-FileCopyrightText: 2026 Reachback Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Reachback call follow-up daemon.
//!
//! This crate provides the foundational trait definitions, error types, and
//! common types used throughout the Reachback workspace. The host-facing
//! ports (call source, notifier, permission gate, link opener) and the
//! internal ports (state store, follow-up API) are all defined here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::ReachbackError;
pub use types::{
    ActionEvent, AdapterKind, AnalyzedCall, CallKind, ChannelKind, ChannelSpec, HealthStatus,
    MessageTemplate, Notification, NotificationAction, PermissionStatus, PromptAction,
    RawCallRecord, ACTION_NO_CLIENT, ACTION_SEND_SMS, ACTION_SEND_WHATSAPP,
};

// Re-export all port traits at crate root.
pub use traits::{
    Adapter, CallEventSource, CallSink, FollowupApi, LinkOpener, Notifier, PermissionGate,
    StateStore,
};
