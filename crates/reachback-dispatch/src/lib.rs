// SPDX-FileCopyrightText: 2026 Reachback Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound messaging dispatch for the Reachback daemon.
//!
//! Opens an external messaging channel through a deep link. WhatsApp falls
//! back to its public web equivalent when the native app is not resolvable;
//! SMS has no fallback and fails hard when unsupported. Dispatch is
//! fire-and-forget: success means the channel was invoked, not that the
//! message was delivered.

use std::sync::Arc;

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reachback_core::{ChannelKind, LinkOpener, ReachbackError};
use tracing::{info, warn};

/// Builds the native WhatsApp deep link.
pub fn whatsapp_uri(number: &str, message: &str) -> String {
    format!(
        "whatsapp://send?phone={}&text={}",
        number,
        utf8_percent_encode(message, NON_ALPHANUMERIC)
    )
}

/// Builds the public web fallback for WhatsApp. wa.me rejects a leading `+`.
pub fn wa_me_uri(number: &str, message: &str) -> String {
    format!(
        "https://wa.me/{}?text={}",
        number.trim_start_matches('+'),
        utf8_percent_encode(message, NON_ALPHANUMERIC)
    )
}

/// Builds the SMS compose intent.
pub fn sms_uri(number: &str, message: &str) -> String {
    format!(
        "sms:{}?body={}",
        number,
        utf8_percent_encode(message, NON_ALPHANUMERIC)
    )
}

/// Opens external messaging channels via the host link opener.
pub struct MessagingDispatcher {
    opener: Arc<dyn LinkOpener>,
}

impl MessagingDispatcher {
    /// Creates a dispatcher over the given link opener.
    pub fn new(opener: Arc<dyn LinkOpener>) -> Self {
        Self { opener }
    }

    /// Invokes the external channel with a prefilled message.
    pub async fn send(
        &self,
        channel: ChannelKind,
        number: &str,
        message: &str,
    ) -> Result<(), ReachbackError> {
        match channel {
            ChannelKind::Whatsapp => self.send_whatsapp(number, message).await,
            ChannelKind::Sms => self.send_sms(number, message).await,
        }
    }

    async fn send_whatsapp(&self, number: &str, message: &str) -> Result<(), ReachbackError> {
        let deep_link = whatsapp_uri(number, message);

        if self.opener.can_open(&deep_link).await {
            match self.opener.open(&deep_link).await {
                Ok(()) => {
                    info!(number, "WhatsApp deep link opened");
                    return Ok(());
                }
                Err(e) => {
                    warn!(error = %e, "WhatsApp deep link failed, falling back to wa.me");
                }
            }
        } else {
            warn!(number, "WhatsApp app not resolvable, falling back to wa.me");
        }

        let web_link = wa_me_uri(number, message);
        self.opener
            .open(&web_link)
            .await
            .map_err(|e| ReachbackError::Dispatch {
                message: format!("wa.me fallback failed for {number}"),
                source: Some(Box::new(e)),
            })?;
        info!(number, "wa.me fallback opened");
        Ok(())
    }

    async fn send_sms(&self, number: &str, message: &str) -> Result<(), ReachbackError> {
        let uri = sms_uri(number, message);

        if !self.opener.can_open(&uri).await {
            return Err(ReachbackError::Dispatch {
                message: format!("SMS compose is not supported on this device for {number}"),
                source: None,
            });
        }

        self.opener
            .open(&uri)
            .await
            .map_err(|e| ReachbackError::Dispatch {
                message: format!("SMS compose failed for {number}"),
                source: Some(Box::new(e)),
            })?;
        info!(number, "SMS compose opened");
        Ok(())
    }
}
