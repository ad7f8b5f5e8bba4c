// SPDX-FileCopyrightText: 2026 Reachback Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence layer for the Reachback monitoring state.
//!
//! Provides WAL-mode SQLite storage with embedded migrations, a single-writer
//! concurrency model via `tokio-rusqlite`, and narrow field-scoped operations
//! for the blacklist, the sent-message ledger, and setting overrides. The
//! narrow operations are what make the store safe to share between the
//! foreground lifecycle and the background action pipeline.

pub mod adapter;
pub mod database;
pub mod migrations;
pub mod models;
pub mod queries;

pub use adapter::SqliteStateStore;
pub use database::Database;
pub use models::{MonitorSettings, SETTING_COOLDOWN_DAYS, SETTING_MIN_CALL_DURATION};
