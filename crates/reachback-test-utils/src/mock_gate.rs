// SPDX-FileCopyrightText: 2026 Reachback Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock permission gate for lifecycle testing.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use reachback_core::{PermissionGate, PermissionStatus, ReachbackError};

/// A mock permission gate with scripted check/request outcomes.
pub struct MockPermissionGate {
    check_status: PermissionStatus,
    request_grants: bool,
    settings_opened: AtomicUsize,
}

impl MockPermissionGate {
    /// Permission is already granted; `request()` is never needed.
    pub fn granted() -> Self {
        Self {
            check_status: PermissionStatus::Granted,
            request_grants: true,
            settings_opened: AtomicUsize::new(0),
        }
    }

    /// Permission is denied and the request is refused.
    pub fn denied() -> Self {
        Self {
            check_status: PermissionStatus::Denied,
            request_grants: false,
            settings_opened: AtomicUsize::new(0),
        }
    }

    /// Permission is not yet granted but the request succeeds.
    pub fn denied_then_granted_on_request() -> Self {
        Self {
            check_status: PermissionStatus::Denied,
            request_grants: true,
            settings_opened: AtomicUsize::new(0),
        }
    }

    /// Number of times the system-settings prompt was opened.
    pub fn settings_opened(&self) -> usize {
        self.settings_opened.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PermissionGate for MockPermissionGate {
    async fn check(&self) -> Result<PermissionStatus, ReachbackError> {
        Ok(self.check_status)
    }

    async fn request(&self) -> Result<bool, ReachbackError> {
        Ok(self.request_grants)
    }

    async fn open_settings(&self) {
        self.settings_opened.fetch_add(1, Ordering::SeqCst);
    }
}
