// SPDX-FileCopyrightText: 2026 Reachback Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for loaded configuration.
//!
//! Figment/serde catch type errors and unknown keys; this module checks the
//! value-level constraints that a structurally valid config can still break.

use crate::diagnostic::ConfigError;
use crate::model::ReachbackConfig;

/// Validate a loaded configuration, collecting all problems rather than
/// stopping at the first.
pub fn validate_config(config: &ReachbackConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.monitor.cooldown_days > 365 {
        errors.push(ConfigError::new(
            "monitor.cooldown_days",
            format!(
                "cooldown_days is {} but must be at most 365",
                config.monitor.cooldown_days
            ),
            "use a cooldown of one year or less",
        ));
    }

    if config.monitor.min_call_duration_seconds > 86_400 {
        errors.push(ConfigError::new(
            "monitor.min_call_duration_seconds",
            format!(
                "min_call_duration_seconds is {} but must be at most 86400",
                config.monitor.min_call_duration_seconds
            ),
            "calls cannot be longer than a day",
        ));
    }

    if config.monitor.dedup_window_secs == Some(0) {
        errors.push(ConfigError::new(
            "monitor.dedup_window_secs",
            "dedup_window_secs must be greater than zero".to_string(),
            "omit the key to derive the window from cooldown_days",
        ));
    }

    if !config.api.base_url.starts_with("http://") && !config.api.base_url.starts_with("https://")
    {
        errors.push(ConfigError::new(
            "api.base_url",
            format!("base_url '{}' is not an http(s) URL", config.api.base_url),
            "example: https://followup.example.com/api",
        ));
    }

    if config.pipeline.step_timeout_secs == 0 {
        errors.push(ConfigError::new(
            "pipeline.step_timeout_secs",
            "step_timeout_secs must be greater than zero".to_string(),
            "the background pipeline needs a bounded but non-zero step window",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MonitorConfig, PipelineConfig};

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&ReachbackConfig::default()).is_ok());
    }

    #[test]
    fn rejects_excessive_cooldown() {
        let config = ReachbackConfig {
            monitor: MonitorConfig {
                cooldown_days: 400,
                ..MonitorConfig::default()
            },
            ..ReachbackConfig::default()
        };
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].key.contains("cooldown_days"));
    }

    #[test]
    fn rejects_zero_step_timeout() {
        let config = ReachbackConfig {
            pipeline: PipelineConfig {
                step_timeout_secs: 0,
            },
            ..ReachbackConfig::default()
        };
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn rejects_non_http_base_url() {
        let mut config = ReachbackConfig::default();
        config.api.base_url = "ftp://example.com".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors[0].key.contains("base_url"));
    }

    #[test]
    fn collects_multiple_errors() {
        let mut config = ReachbackConfig::default();
        config.monitor.cooldown_days = 9999;
        config.pipeline.step_timeout_secs = 0;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
    }
}
