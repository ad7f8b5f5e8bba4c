// SPDX-FileCopyrightText: 2026 Reachback Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Background action pipeline for the Reachback daemon.
//!
//! An action press on a client-check prompt arrives as an [`ActionEvent`]
//! from the notification port; [`ActionHandler`] maps it to a sequence of
//! effects (blacklist append, template fetch, audit writes, dispatch,
//! ledger update) ending in a terminal notification cancel. The handler is
//! a function from event to [`Outcome`] over injected ports, so it is fully
//! testable without a host runtime.
//!
//! [`ActionEvent`]: reachback_core::ActionEvent

pub mod action_loop;
pub mod handler;
pub mod templates;

pub use action_loop::ActionLoop;
pub use handler::{ActionHandler, Outcome};
pub use templates::{select_primary, FALLBACK_MESSAGE};
