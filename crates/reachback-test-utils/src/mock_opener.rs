// SPDX-FileCopyrightText: 2026 Reachback Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock link opener for dispatch testing.

use std::sync::Mutex;

use async_trait::async_trait;

use reachback_core::{LinkOpener, ReachbackError};

/// A mock link opener that records opened URIs.
///
/// Every URI resolves by default; `deny_prefix()` makes matching URIs
/// unresolvable, and `fail_prefix()` makes opening them fail.
pub struct MockOpener {
    opened: Mutex<Vec<String>>,
    deny_prefixes: Mutex<Vec<String>>,
    fail_prefixes: Mutex<Vec<String>>,
}

impl MockOpener {
    /// Create an opener that resolves and opens everything.
    pub fn new() -> Self {
        Self {
            opened: Mutex::new(Vec::new()),
            deny_prefixes: Mutex::new(Vec::new()),
            fail_prefixes: Mutex::new(Vec::new()),
        }
    }

    /// URIs with this prefix report as unresolvable.
    pub fn deny_prefix(&self, prefix: &str) {
        self.deny_prefixes
            .lock()
            .expect("lock poisoned")
            .push(prefix.to_string());
    }

    /// URIs with this prefix resolve but fail on open.
    pub fn fail_prefix(&self, prefix: &str) {
        self.fail_prefixes
            .lock()
            .expect("lock poisoned")
            .push(prefix.to_string());
    }

    /// All successfully opened URIs, in order.
    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().expect("lock poisoned").clone()
    }
}

impl Default for MockOpener {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LinkOpener for MockOpener {
    async fn can_open(&self, uri: &str) -> bool {
        !self
            .deny_prefixes
            .lock()
            .expect("lock poisoned")
            .iter()
            .any(|p| uri.starts_with(p.as_str()))
    }

    async fn open(&self, uri: &str) -> Result<(), ReachbackError> {
        let fails = self
            .fail_prefixes
            .lock()
            .expect("lock poisoned")
            .iter()
            .any(|p| uri.starts_with(p.as_str()));
        if fails {
            return Err(ReachbackError::Dispatch {
                message: format!("mock open failure for {uri}"),
                source: None,
            });
        }
        self.opened
            .lock()
            .expect("lock poisoned")
            .push(uri.to_string());
        Ok(())
    }
}
