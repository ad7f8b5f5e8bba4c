// SPDX-FileCopyrightText: 2026 Reachback Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Link opener trait for launching external messaging channels.

use async_trait::async_trait;

use crate::error::ReachbackError;

/// Port for opening deep links in external applications.
///
/// The dispatcher uses [`can_open`] to decide between a native deep link
/// and its web fallback before invoking [`open`].
///
/// [`can_open`]: LinkOpener::can_open
/// [`open`]: LinkOpener::open
#[async_trait]
pub trait LinkOpener: Send + Sync + 'static {
    /// Returns whether the host can resolve a handler for the given URI.
    async fn can_open(&self, uri: &str) -> bool;

    /// Opens the URI in its external handler.
    async fn open(&self, uri: &str) -> Result<(), ReachbackError>;
}
