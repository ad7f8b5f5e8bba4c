// SPDX-FileCopyrightText: 2026 Reachback Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Reachback daemon.

use thiserror::Error;

/// The primary error type used across all Reachback port traits and core operations.
#[derive(Debug, Error)]
pub enum ReachbackError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Persisted-store errors (database connection, query failure, serialization).
    #[error("store error: {source}")]
    Store {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Follow-up API errors (template fetch, call-log or message-log writes).
    #[error("api error: {message}")]
    Api {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Notification port errors (channel registration, display, cancel).
    #[error("notify error: {message}")]
    Notify {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Outbound dispatch errors (deep link could not be opened).
    #[error("dispatch error: {message}")]
    Dispatch {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The call-log read permission was denied by the host.
    #[error("call-log permission denied")]
    PermissionDenied,

    /// No authenticated session is present; background actions fail closed.
    #[error("no authenticated session")]
    Unauthenticated,

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
