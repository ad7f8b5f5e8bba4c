// SPDX-FileCopyrightText: 2026 Reachback Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the StateStore trait.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use reachback_config::model::StorageConfig;
use reachback_core::{
    Adapter, AdapterKind, HealthStatus, ReachbackError, StateStore,
};

use crate::database::Database;
use crate::queries;

/// SQLite-backed monitoring state store.
///
/// Wraps a [`Database`] handle and delegates all operations to the typed
/// query modules. The database is lazily initialized on the first call to
/// [`StateStore::initialize`].
pub struct SqliteStateStore {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStateStore {
    /// Create a new SqliteStateStore with the given configuration.
    ///
    /// The database connection is not opened until `initialize` is called.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Returns a reference to the underlying Database, or an error if not initialized.
    fn db(&self) -> Result<&Database, ReachbackError> {
        self.db.get().ok_or_else(|| ReachbackError::Store {
            source: "store not initialized -- call initialize() first".into(),
        })
    }
}

#[async_trait]
impl Adapter for SqliteStateStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn kind(&self) -> AdapterKind {
        AdapterKind::Store
    }

    async fn health_check(&self) -> Result<HealthStatus, ReachbackError> {
        let db = self.db()?;
        db.connection()
            .call(|conn| {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(crate::database::map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), ReachbackError> {
        // Shutdown delegates to close if the DB was initialized.
        if let Some(db) = self.db.get() {
            db.close().await?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl StateStore for SqliteStateStore {
    async fn initialize(&self) -> Result<(), ReachbackError> {
        let db = Database::open(&self.config.database_path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| ReachbackError::Store {
            source: "store already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite state store initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), ReachbackError> {
        self.db()?.close().await
    }

    // --- Blacklist ---

    async fn blacklist_add(&self, number: &str) -> Result<(), ReachbackError> {
        queries::blacklist::add(self.db()?, number).await
    }

    async fn blacklist_remove(&self, number: &str) -> Result<bool, ReachbackError> {
        queries::blacklist::remove(self.db()?, number).await
    }

    async fn blacklist_contains(&self, number: &str) -> Result<bool, ReachbackError> {
        queries::blacklist::contains(self.db()?, number).await
    }

    async fn blacklist_all(&self) -> Result<Vec<String>, ReachbackError> {
        queries::blacklist::all(self.db()?).await
    }

    // --- Sent-message ledger ---

    async fn record_sent(
        &self,
        number: &str,
        timestamp_millis: i64,
    ) -> Result<(), ReachbackError> {
        queries::ledger::record_sent(self.db()?, number, timestamp_millis).await
    }

    async fn last_sent(&self, number: &str) -> Result<Option<i64>, ReachbackError> {
        queries::ledger::last_sent(self.db()?, number).await
    }

    // --- Settings overrides ---

    async fn get_setting(&self, key: &str) -> Result<Option<String>, ReachbackError> {
        queries::settings::get(self.db()?, key).await
    }

    async fn put_setting(&self, key: &str, value: &str) -> Result<(), ReachbackError> {
        queries::settings::put(self.db()?, key, value).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn make_config(path: &str) -> StorageConfig {
        StorageConfig {
            database_path: path.to_string(),
            wal_mode: true,
        }
    }

    #[tokio::test]
    async fn implements_adapter_metadata() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("meta.db");
        let store = SqliteStateStore::new(make_config(db_path.to_str().unwrap()));

        assert_eq!(store.name(), "sqlite");
        assert_eq!(store.version(), semver::Version::new(0, 1, 0));
        assert_eq!(store.kind(), AdapterKind::Store);
    }

    #[tokio::test]
    async fn initialize_opens_database_at_configured_path() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("init.db");
        let store = SqliteStateStore::new(make_config(db_path.to_str().unwrap()));

        store.initialize().await.unwrap();
        assert!(db_path.exists(), "database file should be created");
    }

    #[tokio::test]
    async fn initialize_twice_returns_error() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("double.db");
        let store = SqliteStateStore::new(make_config(db_path.to_str().unwrap()));

        store.initialize().await.unwrap();
        assert!(store.initialize().await.is_err());
    }

    #[tokio::test]
    async fn health_check_fails_when_not_initialized() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("health.db");
        let store = SqliteStateStore::new(make_config(db_path.to_str().unwrap()));

        assert!(store.health_check().await.is_err());
        store.initialize().await.unwrap();
        assert_eq!(store.health_check().await.unwrap(), HealthStatus::Healthy);
    }

    #[tokio::test]
    async fn full_monitoring_state_lifecycle() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("lifecycle.db");
        let store = SqliteStateStore::new(make_config(db_path.to_str().unwrap()));
        store.initialize().await.unwrap();

        // Blacklist grows by narrow appends.
        store.blacklist_add("+911234567890").await.unwrap();
        store.blacklist_add("+15550001").await.unwrap();
        assert!(store.blacklist_contains("+911234567890").await.unwrap());
        assert_eq!(store.blacklist_all().await.unwrap().len(), 2);

        // Explicit removal shrinks it.
        assert!(store.blacklist_remove("+15550001").await.unwrap());
        assert_eq!(store.blacklist_all().await.unwrap().len(), 1);

        // Ledger upserts per number.
        store.record_sent("+911234567890", 1000).await.unwrap();
        store.record_sent("+911234567890", 2000).await.unwrap();
        assert_eq!(store.last_sent("+911234567890").await.unwrap(), Some(2000));
        assert_eq!(store.last_sent("+15559999").await.unwrap(), None);

        // Settings overrides.
        store.put_setting("cooldown_days", "5").await.unwrap();
        assert_eq!(
            store.get_setting("cooldown_days").await.unwrap().as_deref(),
            Some("5")
        );

        store.close().await.unwrap();
    }

    #[tokio::test]
    async fn state_survives_reopen() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("persist.db");

        {
            let store = SqliteStateStore::new(make_config(db_path.to_str().unwrap()));
            store.initialize().await.unwrap();
            store.blacklist_add("+911234567890").await.unwrap();
            store.record_sent("+911234567890", 1234).await.unwrap();
            store.shutdown().await.unwrap();
        }

        let store = SqliteStateStore::new(make_config(db_path.to_str().unwrap()));
        store.initialize().await.unwrap();
        assert!(store.blacklist_contains("+911234567890").await.unwrap());
        assert_eq!(store.last_sent("+911234567890").await.unwrap(), Some(1234));
        store.close().await.unwrap();
    }
}
