// SPDX-FileCopyrightText: 2026 Reachback Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sent-message ledger operations.
//!
//! One row per number holding the last successful send time. Writes are
//! keyed upserts so a background send cannot clobber an unrelated number's
//! entry written by the foreground.

use reachback_core::ReachbackError;
use rusqlite::params;

use crate::database::Database;

/// Record the last send time for a number, replacing any earlier entry.
pub async fn record_sent(
    db: &Database,
    number: &str,
    timestamp_millis: i64,
) -> Result<(), ReachbackError> {
    let number = number.to_string();
    let now = chrono::Utc::now().to_rfc3339();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO sent_ledger (number, last_sent_ms, updated_at)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT(number) DO UPDATE SET
                     last_sent_ms = excluded.last_sent_ms,
                     updated_at = excluded.updated_at",
                params![number, timestamp_millis, now],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Return the last send time for a number, if any.
pub async fn last_sent(db: &Database, number: &str) -> Result<Option<i64>, ReachbackError> {
    let number = number.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt =
                conn.prepare("SELECT last_sent_ms FROM sent_ledger WHERE number = ?1")?;
            let mut rows = stmt.query_map(params![number], |row| row.get(0))?;
            match rows.next() {
                Some(row) => Ok(Some(row?)),
                None => Ok(None),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}
