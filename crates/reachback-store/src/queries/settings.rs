// SPDX-FileCopyrightText: 2026 Reachback Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Operator-tunable setting overrides.

use reachback_core::ReachbackError;
use rusqlite::params;

use crate::database::Database;

/// Read a setting override, if one has been written.
pub async fn get(db: &Database, key: &str) -> Result<Option<String>, ReachbackError> {
    let key = key.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare("SELECT value FROM settings WHERE key = ?1")?;
            let mut rows = stmt.query_map(params![key], |row| row.get(0))?;
            match rows.next() {
                Some(row) => Ok(Some(row?)),
                None => Ok(None),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Write a setting override, replacing any earlier value for the key.
pub async fn put(db: &Database, key: &str, value: &str) -> Result<(), ReachbackError> {
    let key = key.to_string();
    let value = value.to_string();
    let now = chrono::Utc::now().to_rfc3339();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO settings (key, value, updated_at)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET
                     value = excluded.value,
                     updated_at = excluded.updated_at",
                params![key, value, now],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn put_get_and_overwrite() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("settings.db");
        let db = Database::open(db_path.to_str().unwrap(), true).await.unwrap();

        assert_eq!(get(&db, "cooldown_days").await.unwrap(), None);
        put(&db, "cooldown_days", "5").await.unwrap();
        assert_eq!(
            get(&db, "cooldown_days").await.unwrap(),
            Some("5".to_string())
        );
        put(&db, "cooldown_days", "7").await.unwrap();
        assert_eq!(
            get(&db, "cooldown_days").await.unwrap(),
            Some("7".to_string())
        );

        db.close().await.unwrap();
    }
}
