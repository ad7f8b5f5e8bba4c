// SPDX-FileCopyrightText: 2026 Reachback Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./reachback.toml` > `~/.config/reachback/reachback.toml`
//! > `/etc/reachback/reachback.toml` with environment variable overrides via
//! `REACHBACK_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::ReachbackConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/reachback/reachback.toml` (system-wide)
/// 3. `~/.config/reachback/reachback.toml` (user XDG config)
/// 4. `./reachback.toml` (local directory)
/// 5. `REACHBACK_*` environment variables
pub fn load_config() -> Result<ReachbackConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ReachbackConfig::default()))
        .merge(Toml::file("/etc/reachback/reachback.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("reachback/reachback.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("reachback.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<ReachbackConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ReachbackConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<ReachbackConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ReachbackConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// CRITICAL: Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names. For example, `REACHBACK_API_BASE_URL` must
/// map to `api.base_url`, not `api.base.url`.
fn env_provider() -> Env {
    Env::prefixed("REACHBACK_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: REACHBACK_API_BASE_URL -> "api_base_url"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("service_", "service.", 1)
            .replacen("monitor_", "monitor.", 1)
            .replacen("api_", "api.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("notify_", "notify.", 1)
            .replacen("pipeline_", "pipeline.", 1);
        mapped.into()
    })
}
