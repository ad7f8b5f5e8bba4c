// SPDX-FileCopyrightText: 2026 Reachback Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Miette-based diagnostic rendering for configuration errors.

use miette::Diagnostic;
use thiserror::Error;

/// A single configuration problem with the offending key and a help hint.
#[derive(Debug, Error, Diagnostic)]
#[error("config error at `{key}`: {message}")]
pub struct ConfigError {
    /// Dotted path of the offending key (e.g. `monitor.cooldown_days`).
    pub key: String,
    /// What is wrong with the value.
    pub message: String,
    /// How to fix it.
    #[help]
    pub help: String,
}

impl ConfigError {
    /// Creates a new config error for the given dotted key path.
    pub fn new(
        key: impl Into<String>,
        message: impl Into<String>,
        help: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            message: message.into(),
            help: help.into(),
        }
    }
}

/// Converts a Figment extraction error into the diagnostic error list.
pub fn figment_to_config_errors(err: figment::Error) -> Vec<ConfigError> {
    err.into_iter()
        .map(|e| {
            let key = if e.path.is_empty() {
                "<root>".to_string()
            } else {
                e.path.join(".")
            };
            ConfigError::new(
                key,
                e.kind.to_string(),
                "check reachback.toml and REACHBACK_* environment variables",
            )
        })
        .collect()
}

/// Renders all collected config errors to stderr via miette's fancy reporter.
pub fn render_errors(errors: &[ConfigError]) {
    for err in errors {
        let report = miette::Report::msg(format!("{err}"));
        eprintln!("{report:?}");
        eprintln!("  help: {}", err.help);
    }
}
