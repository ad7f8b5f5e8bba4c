// SPDX-FileCopyrightText: 2026 Reachback Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `reachback status` command implementation.
//!
//! Prints the persisted monitoring state: effective thresholds and the
//! blacklist. Read-only — safe to run while the daemon is serving.

use reachback_config::model::ReachbackConfig;
use reachback_core::{ReachbackError, StateStore};
use reachback_store::{MonitorSettings, SqliteStateStore};

/// Runs the `reachback status` command.
pub async fn run_status(config: ReachbackConfig) -> Result<(), ReachbackError> {
    let store = SqliteStateStore::new(config.storage.clone());
    store.initialize().await?;

    let settings = MonitorSettings::resolve(&store, &config.monitor).await?;
    let blacklist = store.blacklist_all().await?;

    println!("service:                  {}", config.service.name);
    println!("database:                 {}", config.storage.database_path);
    println!("cooldown days:            {}", settings.cooldown_days);
    println!(
        "min call duration (secs): {}",
        settings.min_call_duration_seconds
    );
    println!("cooldown enforcement:     {}", config.monitor.enforce_cooldown);
    println!("blacklisted numbers:      {}", blacklist.len());
    for number in &blacklist {
        println!("  {number}");
    }

    store.close().await?;
    Ok(())
}
