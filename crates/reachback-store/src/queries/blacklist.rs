// SPDX-FileCopyrightText: 2026 Reachback Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Blacklist set operations.
//!
//! The blacklist is mutated as an append-to-set (INSERT OR IGNORE), never by
//! whole-set replacement, so concurrent foreground and background writers
//! cannot lose each other's additions.

use reachback_core::ReachbackError;
use rusqlite::params;

use crate::database::Database;

/// Add a number to the blacklist. Re-adding an existing number is a no-op.
pub async fn add(db: &Database, number: &str) -> Result<(), ReachbackError> {
    let number = number.to_string();
    let now = chrono::Utc::now().to_rfc3339();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT OR IGNORE INTO blacklist (number, added_at) VALUES (?1, ?2)",
                params![number, now],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Remove a number from the blacklist; returns whether it was present.
pub async fn remove(db: &Database, number: &str) -> Result<bool, ReachbackError> {
    let number = number.to_string();
    db.connection()
        .call(move |conn| {
            let changed = conn.execute(
                "DELETE FROM blacklist WHERE number = ?1",
                params![number],
            )?;
            Ok(changed > 0)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Return whether a number is blacklisted.
pub async fn contains(db: &Database, number: &str) -> Result<bool, ReachbackError> {
    let number = number.to_string();
    db.connection()
        .call(move |conn| {
            let exists: bool = conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM blacklist WHERE number = ?1)",
                params![number],
                |row| row.get(0),
            )?;
            Ok(exists)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Return all blacklisted numbers in insertion order.
pub async fn all(db: &Database) -> Result<Vec<String>, ReachbackError> {
    db.connection()
        .call(|conn| {
            let mut stmt =
                conn.prepare("SELECT number FROM blacklist ORDER BY added_at, number")?;
            let rows = stmt.query_map([], |row| row.get(0))?;
            let mut numbers = Vec::new();
            for row in rows {
                numbers.push(row?);
            }
            Ok(numbers)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn open_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("blacklist.db");
        let db = Database::open(db_path.to_str().unwrap(), true).await.unwrap();
        (db, dir)
    }

    #[tokio::test]
    async fn add_and_contains() {
        let (db, _dir) = open_db().await;

        assert!(!contains(&db, "+15551234").await.unwrap());
        add(&db, "+15551234").await.unwrap();
        assert!(contains(&db, "+15551234").await.unwrap());

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn double_add_is_noop() {
        let (db, _dir) = open_db().await;

        add(&db, "+15551234").await.unwrap();
        add(&db, "+15551234").await.unwrap();
        assert_eq!(all(&db).await.unwrap().len(), 1);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn remove_reports_presence() {
        let (db, _dir) = open_db().await;

        add(&db, "+15551234").await.unwrap();
        assert!(remove(&db, "+15551234").await.unwrap());
        assert!(!remove(&db, "+15551234").await.unwrap());
        assert!(!contains(&db, "+15551234").await.unwrap());

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn all_returns_every_number() {
        let (db, _dir) = open_db().await;

        add(&db, "+15550001").await.unwrap();
        add(&db, "+15550002").await.unwrap();
        add(&db, "+15550003").await.unwrap();

        let numbers = all(&db).await.unwrap();
        assert_eq!(numbers.len(), 3);
        assert!(numbers.contains(&"+15550002".to_string()));

        db.close().await.unwrap();
    }
}
