// SPDX-FileCopyrightText: 2026 Reachback Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed query modules for the monitoring-state tables.

pub mod blacklist;
pub mod ledger;
pub mod settings;
