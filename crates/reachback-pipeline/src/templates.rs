// SPDX-FileCopyrightText: 2026 Reachback Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Template selection for follow-up messages.

use reachback_core::{CallKind, MessageTemplate};

/// Fixed message used when no primary template is available.
pub const FALLBACK_MESSAGE: &str =
    "Thank you for your call. We will get back to you shortly.";

/// Picks the primary template for a call kind.
///
/// First match wins when more than one template is incorrectly marked
/// primary for the same type; no further tie-break is defined upstream.
pub fn select_primary(templates: &[MessageTemplate], kind: CallKind) -> Option<&MessageTemplate> {
    let kind_name = kind.to_string();
    templates
        .iter()
        .find(|t| t.is_primary && t.template_type.eq_ignore_ascii_case(&kind_name))
}
