// SPDX-FileCopyrightText: 2026 Reachback Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Resolved monitoring settings.
//!
//! Config supplies the defaults; the settings table holds operator
//! overrides written from the settings surface. Overrides win.

use reachback_config::model::MonitorConfig;
use reachback_core::{ReachbackError, StateStore};
use tracing::warn;

/// Settings key for the cooldown period override.
pub const SETTING_COOLDOWN_DAYS: &str = "cooldown_days";
/// Settings key for the minimum call duration override.
pub const SETTING_MIN_CALL_DURATION: &str = "min_call_duration_seconds";

/// Effective monitoring thresholds after merging config and store overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorSettings {
    pub cooldown_days: u32,
    pub min_call_duration_seconds: u32,
}

impl MonitorSettings {
    /// Resolves the effective settings: persisted overrides take precedence
    /// over config defaults. Unparseable overrides are logged and ignored.
    pub async fn resolve(
        store: &dyn StateStore,
        config: &MonitorConfig,
    ) -> Result<Self, ReachbackError> {
        let cooldown_days = read_override(store, SETTING_COOLDOWN_DAYS)
            .await?
            .unwrap_or(config.cooldown_days);
        let min_call_duration_seconds = read_override(store, SETTING_MIN_CALL_DURATION)
            .await?
            .unwrap_or(config.min_call_duration_seconds);

        Ok(Self {
            cooldown_days,
            min_call_duration_seconds,
        })
    }

    /// Cooldown period expressed in milliseconds.
    pub fn cooldown_millis(&self) -> i64 {
        i64::from(self.cooldown_days) * 86_400_000
    }
}

async fn read_override(
    store: &dyn StateStore,
    key: &str,
) -> Result<Option<u32>, ReachbackError> {
    let Some(raw) = store.get_setting(key).await? else {
        return Ok(None);
    };
    match raw.parse::<u32>() {
        Ok(v) => Ok(Some(v)),
        Err(_) => {
            warn!(key, value = raw.as_str(), "ignoring unparseable setting override");
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::SqliteStateStore;
    use reachback_config::model::StorageConfig;
    use tempfile::tempdir;

    async fn open_store(dir: &tempfile::TempDir) -> SqliteStateStore {
        let db_path = dir.path().join("settings.db");
        let store = SqliteStateStore::new(StorageConfig {
            database_path: db_path.to_str().unwrap().to_string(),
            wal_mode: true,
        });
        store.initialize().await.unwrap();
        store
    }

    #[tokio::test]
    async fn config_defaults_apply_without_overrides() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir).await;
        let config = MonitorConfig {
            cooldown_days: 4,
            min_call_duration_seconds: 12,
            ..MonitorConfig::default()
        };

        let settings = MonitorSettings::resolve(&store, &config).await.unwrap();
        assert_eq!(settings.cooldown_days, 4);
        assert_eq!(settings.min_call_duration_seconds, 12);

        store.close().await.unwrap();
    }

    #[tokio::test]
    async fn store_overrides_win_over_config() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir).await;
        store
            .put_setting(SETTING_COOLDOWN_DAYS, "9")
            .await
            .unwrap();

        let config = MonitorConfig::default();
        let settings = MonitorSettings::resolve(&store, &config).await.unwrap();
        assert_eq!(settings.cooldown_days, 9);
        assert_eq!(
            settings.min_call_duration_seconds,
            config.min_call_duration_seconds
        );

        store.close().await.unwrap();
    }

    #[tokio::test]
    async fn unparseable_override_falls_back_to_config() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir).await;
        store
            .put_setting(SETTING_COOLDOWN_DAYS, "soon")
            .await
            .unwrap();

        let settings = MonitorSettings::resolve(&store, &MonitorConfig::default())
            .await
            .unwrap();
        assert_eq!(settings.cooldown_days, 3);

        store.close().await.unwrap();
    }

    #[test]
    fn cooldown_millis_converts_days() {
        let settings = MonitorSettings {
            cooldown_days: 2,
            min_call_duration_seconds: 0,
        };
        assert_eq!(settings.cooldown_millis(), 172_800_000);
    }
}
