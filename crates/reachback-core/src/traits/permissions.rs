// SPDX-FileCopyrightText: 2026 Reachback Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Permission gate trait for the host permission subsystem.

use async_trait::async_trait;

use crate::error::ReachbackError;
use crate::types::PermissionStatus;

/// Port for the host's call-log permission subsystem.
#[async_trait]
pub trait PermissionGate: Send + Sync + 'static {
    /// Checks the current call-log permission status without prompting.
    async fn check(&self) -> Result<PermissionStatus, ReachbackError>;

    /// Requests the call-log permission set; returns whether it was granted.
    async fn request(&self) -> Result<bool, ReachbackError>;

    /// Directs the user to the system settings page for this application.
    ///
    /// Fire-and-forget: failures are swallowed by the implementation.
    async fn open_settings(&self);
}
