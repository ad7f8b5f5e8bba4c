// SPDX-FileCopyrightText: 2026 Reachback Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Reachback daemon.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Reachback configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ReachbackConfig {
    /// Daemon identity and logging settings.
    #[serde(default)]
    pub service: ServiceConfig,

    /// Call monitoring thresholds and dedup settings.
    #[serde(default)]
    pub monitor: MonitorConfig,

    /// Follow-up REST API settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Persisted store settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Notification channel settings.
    #[serde(default)]
    pub notify: NotifyConfig,

    /// Background pipeline settings.
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

/// Daemon identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// Display name of the daemon.
    #[serde(default = "default_service_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_service_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_service_name() -> String {
    "reachback".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Call monitoring configuration.
///
/// `cooldown_days` and `min_call_duration_seconds` are defaults only; the
/// persisted store's settings overrides take precedence at runtime.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MonitorConfig {
    /// Minimum days between follow-up messages to the same number.
    #[serde(default = "default_cooldown_days")]
    pub cooldown_days: u32,

    /// Calls shorter than this (incoming/outgoing) never produce a prompt.
    #[serde(default = "default_min_call_duration")]
    pub min_call_duration_seconds: u32,

    /// Age bound for the deduplication window. `None` derives it from
    /// `cooldown_days`.
    #[serde(default)]
    pub dedup_window_secs: Option<u64>,

    /// Suppress prompts for numbers still inside the cooldown window.
    /// Off by default: the ledger is always written, but enforcement is an
    /// opt-in until confirmed with operators.
    #[serde(default)]
    pub enforce_cooldown: bool,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            cooldown_days: default_cooldown_days(),
            min_call_duration_seconds: default_min_call_duration(),
            dedup_window_secs: None,
            enforce_cooldown: false,
        }
    }
}

impl MonitorConfig {
    /// Effective dedup window: the explicit setting, else the cooldown
    /// period expressed in seconds.
    pub fn effective_dedup_window_secs(&self) -> u64 {
        self.dedup_window_secs
            .unwrap_or(u64::from(self.cooldown_days) * 86_400)
    }
}

fn default_cooldown_days() -> u32 {
    3
}

fn default_min_call_duration() -> u32 {
    0
}

/// Follow-up REST API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ApiConfig {
    /// Base URL of the follow-up service.
    #[serde(default = "default_api_base_url")]
    pub base_url: String,

    /// Role whose template set is fetched.
    #[serde(default = "default_api_role")]
    pub role: String,

    /// Session token. `None` leaves the daemon unauthenticated (fail-closed).
    #[serde(default)]
    pub session_token: Option<String>,

    /// Per-request timeout in seconds.
    #[serde(default = "default_api_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_api_base_url(),
            role: default_api_role(),
            session_token: None,
            request_timeout_secs: default_api_timeout(),
        }
    }
}

fn default_api_base_url() -> String {
    "http://localhost:8080/api".to_string()
}

fn default_api_role() -> String {
    "agent".to_string()
}

fn default_api_timeout() -> u64 {
    15
}

/// Persisted store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("reachback").join("reachback.db"))
        .and_then(|p| p.to_str().map(String::from))
        .unwrap_or_else(|| "reachback.db".to_string())
}

fn default_wal_mode() -> bool {
    true
}

/// Notification channel configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct NotifyConfig {
    /// Host notification channel id.
    #[serde(default = "default_channel_id")]
    pub channel_id: String,

    /// Human-readable channel name shown in host settings.
    #[serde(default = "default_channel_name")]
    pub channel_name: String,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            channel_id: default_channel_id(),
            channel_name: default_channel_name(),
        }
    }
}

fn default_channel_id() -> String {
    "client_check".to_string()
}

fn default_channel_name() -> String {
    "Client follow-up".to_string()
}

/// Background pipeline configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    /// Timeout applied to each remote step of the background pipeline. The
    /// host grants a bounded execution window; every step must resolve or
    /// fail within it so the pipeline reaches its terminal cancel.
    #[serde(default = "default_step_timeout")]
    pub step_timeout_secs: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            step_timeout_secs: default_step_timeout(),
        }
    }
}

fn default_step_timeout() -> u64 {
    10
}
