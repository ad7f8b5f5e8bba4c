// SPDX-FileCopyrightText: 2026 Reachback Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Port trait definitions for the Reachback daemon.

pub mod adapter;
pub mod api;
pub mod call_source;
pub mod notifier;
pub mod opener;
pub mod permissions;
pub mod sink;
pub mod store;

pub use adapter::Adapter;
pub use api::FollowupApi;
pub use call_source::CallEventSource;
pub use notifier::Notifier;
pub use opener::LinkOpener;
pub use permissions::PermissionGate;
pub use sink::CallSink;
pub use store::StateStore;
