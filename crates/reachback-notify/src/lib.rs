// SPDX-FileCopyrightText: 2026 Reachback Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notification gateway for the Reachback daemon.
//!
//! Turns qualifying calls into decision prompts on the host notification
//! subsystem, carrying the serialized call in the payload so the background
//! action handler is self-contained.

pub mod gateway;
pub mod payload;

pub use gateway::NotificationGateway;
pub use payload::{decode as decode_payload, encode as encode_payload, PAYLOAD_TAG};
