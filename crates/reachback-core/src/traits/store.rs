// SPDX-FileCopyrightText: 2026 Reachback Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! State store trait for the persisted monitoring state.

use async_trait::async_trait;

use crate::error::ReachbackError;
use crate::traits::adapter::Adapter;

/// Port for the persisted monitoring state.
///
/// The store is shared between the foreground lifecycle and the background
/// action pipeline. Every mutation is a narrow, field-scoped operation
/// (append-to-set, upsert-by-key) executed against the store's current
/// value, so interleaved writers cannot clobber each other's updates.
#[async_trait]
pub trait StateStore: Adapter {
    /// Initializes the store backend (migrations, connection, etc.).
    async fn initialize(&self) -> Result<(), ReachbackError>;

    /// Closes the store backend, flushing pending writes.
    async fn close(&self) -> Result<(), ReachbackError>;

    // --- Blacklist (append-to-set) ---

    /// Adds a number to the blacklist. Adding an existing number is a no-op.
    async fn blacklist_add(&self, number: &str) -> Result<(), ReachbackError>;

    /// Removes a number from the blacklist; returns whether it was present.
    async fn blacklist_remove(&self, number: &str) -> Result<bool, ReachbackError>;

    /// Returns whether a number is blacklisted.
    async fn blacklist_contains(&self, number: &str) -> Result<bool, ReachbackError>;

    /// Returns all blacklisted numbers.
    async fn blacklist_all(&self) -> Result<Vec<String>, ReachbackError>;

    // --- Sent-message ledger (upsert-by-key) ---

    /// Records the last successful send time for a number, replacing any
    /// earlier entry for the same number.
    async fn record_sent(&self, number: &str, timestamp_millis: i64)
        -> Result<(), ReachbackError>;

    /// Returns the last successful send time for a number, if any.
    async fn last_sent(&self, number: &str) -> Result<Option<i64>, ReachbackError>;

    // --- Operator-tunable settings (keyed overrides) ---

    /// Returns a persisted setting override, if one has been written.
    async fn get_setting(&self, key: &str) -> Result<Option<String>, ReachbackError>;

    /// Writes a persisted setting override.
    async fn put_setting(&self, key: &str, value: &str) -> Result<(), ReachbackError>;
}
