// SPDX-FileCopyrightText: 2026 Reachback Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Base adapter trait that all port adapters must implement.

use async_trait::async_trait;

use crate::error::ReachbackError;
use crate::types::{AdapterKind, HealthStatus};

/// The base trait for all Reachback port adapters.
///
/// Every adapter (call source, notifier, store, etc.) must implement this
/// trait, which provides identity, lifecycle, and health check capabilities.
#[async_trait]
pub trait Adapter: Send + Sync + 'static {
    /// Returns the human-readable name of this adapter instance.
    fn name(&self) -> &str;

    /// Returns the semantic version of this adapter.
    fn version(&self) -> semver::Version;

    /// Returns the kind of adapter (call source, notifier, store, etc.).
    fn kind(&self) -> AdapterKind;

    /// Performs a health check and returns the adapter's current status.
    async fn health_check(&self) -> Result<HealthStatus, ReachbackError>;

    /// Gracefully shuts down the adapter, releasing any held resources.
    async fn shutdown(&self) -> Result<(), ReachbackError>;
}
