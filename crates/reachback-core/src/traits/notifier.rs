// SPDX-FileCopyrightText: 2026 Reachback Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notifier trait for the host notification subsystem.

use async_trait::async_trait;

use crate::error::ReachbackError;
use crate::traits::adapter::Adapter;
use crate::types::{ActionEvent, ChannelSpec, Notification};

/// Port for the host notification subsystem.
///
/// Displays and cancels notifications, and delivers action-press events.
/// Action events arrive even when the foreground process is suspended; the
/// background pipeline consumes them via [`next_action`].
///
/// [`next_action`]: Notifier::next_action
#[async_trait]
pub trait Notifier: Adapter {
    /// Registers the notification channel if it does not already exist.
    async fn ensure_channel(&self, spec: &ChannelSpec) -> Result<(), ReachbackError>;

    /// Displays a notification. Re-displaying the same id replaces the
    /// existing notification rather than stacking a duplicate.
    async fn display(&self, notification: Notification) -> Result<(), ReachbackError>;

    /// Removes the notification with the given id. Cancelling an unknown id
    /// is a no-op.
    async fn cancel(&self, id: &str) -> Result<(), ReachbackError>;

    /// Receives the next action-press event from the host.
    async fn next_action(&self) -> Result<ActionEvent, ReachbackError>;
}
