// SPDX-FileCopyrightText: 2026 Reachback Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Reachback configuration system.

use reachback_config::model::ReachbackConfig;
use reachback_config::{load_and_validate_str, load_config_from_str};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_reachback_config() {
    let toml = r#"
[service]
name = "test-daemon"
log_level = "debug"

[monitor]
cooldown_days = 5
min_call_duration_seconds = 10
dedup_window_secs = 3600
enforce_cooldown = true

[api]
base_url = "https://followup.example.com/api"
role = "sales"
session_token = "tok-123"
request_timeout_secs = 20

[storage]
database_path = "/tmp/test.db"
wal_mode = false

[notify]
channel_id = "client_check"
channel_name = "Client follow-up"

[pipeline]
step_timeout_secs = 8
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.service.name, "test-daemon");
    assert_eq!(config.service.log_level, "debug");
    assert_eq!(config.monitor.cooldown_days, 5);
    assert_eq!(config.monitor.min_call_duration_seconds, 10);
    assert_eq!(config.monitor.dedup_window_secs, Some(3600));
    assert!(config.monitor.enforce_cooldown);
    assert_eq!(config.api.base_url, "https://followup.example.com/api");
    assert_eq!(config.api.role, "sales");
    assert_eq!(config.api.session_token.as_deref(), Some("tok-123"));
    assert_eq!(config.api.request_timeout_secs, 20);
    assert_eq!(config.storage.database_path, "/tmp/test.db");
    assert!(!config.storage.wal_mode);
    assert_eq!(config.pipeline.step_timeout_secs, 8);
}

/// Empty TOML falls back to compiled defaults everywhere.
#[test]
fn empty_toml_uses_defaults() {
    let config = load_config_from_str("").expect("empty config should be valid");
    assert_eq!(config.service.name, "reachback");
    assert_eq!(config.monitor.cooldown_days, 3);
    assert!(config.api.session_token.is_none());
    assert!(config.storage.wal_mode);
}

/// Unknown field in a section produces an error mentioning the bad key.
#[test]
fn unknown_field_in_monitor_produces_error() {
    let toml = r#"
[monitor]
cooldwn_days = 5
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown field");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("cooldwn_days"),
        "error should mention unknown field or the bad key, got: {err_str}"
    );
}

/// Type mismatch (string where integer expected) is rejected.
#[test]
fn type_mismatch_is_rejected() {
    let toml = r#"
[monitor]
cooldown_days = "many"
"#;

    assert!(load_config_from_str(toml).is_err());
}

/// load_and_validate_str runs value-level validation after deserialization.
#[test]
fn validation_rejects_out_of_range_values() {
    let toml = r#"
[monitor]
cooldown_days = 1000
"#;

    let errors = load_and_validate_str(toml).expect_err("should fail validation");
    assert!(!errors.is_empty());
    assert!(errors[0].key.contains("cooldown_days"));
}

/// A partially specified section keeps defaults for the rest.
#[test]
fn partial_section_keeps_other_defaults() {
    let toml = r#"
[api]
base_url = "https://followup.example.com/api"
"#;

    let config = load_config_from_str(toml).unwrap();
    assert_eq!(config.api.base_url, "https://followup.example.com/api");
    assert_eq!(config.api.role, "agent");
    assert_eq!(config.api.request_timeout_secs, 15);
}

/// Defaults survive a full validate pass.
#[test]
fn default_config_passes_validation() {
    let config = load_and_validate_str("").expect("defaults should validate");
    let defaults = ReachbackConfig::default();
    assert_eq!(config.service.name, defaults.service.name);
    assert_eq!(config.monitor.cooldown_days, defaults.monitor.cooldown_days);
    assert_eq!(config.notify.channel_id, defaults.notify.channel_id);
}
