// SPDX-FileCopyrightText: 2026 Reachback Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notification gateway: renders decision prompts for qualifying calls.

use std::sync::Arc;

use async_trait::async_trait;
use reachback_config::model::NotifyConfig;
use reachback_core::{
    AnalyzedCall, CallKind, CallSink, ChannelSpec, Notification, NotificationAction, Notifier,
    ReachbackError, ACTION_NO_CLIENT, ACTION_SEND_SMS, ACTION_SEND_WHATSAPP,
};
use tracing::{debug, info};

use crate::payload;

/// Builds, displays, and cancels client-check prompts.
///
/// Notification identity is derived from the call timestamp, so re-displaying
/// a prompt for the same call replaces the existing one instead of stacking.
pub struct NotificationGateway {
    notifier: Arc<dyn Notifier>,
    channel_id: String,
    channel_name: String,
}

impl NotificationGateway {
    /// Creates a gateway bound to the configured notification channel.
    pub fn new(notifier: Arc<dyn Notifier>, config: &NotifyConfig) -> Self {
        Self {
            notifier,
            channel_id: config.channel_id.clone(),
            channel_name: config.channel_name.clone(),
        }
    }

    /// Deterministic notification id for a call.
    pub fn notification_id(call: &AnalyzedCall) -> String {
        format!("client_check_{}", call.timestamp_millis)
    }

    /// Registers the notification channel with the host. Idempotent.
    pub async fn ensure_channel(&self) -> Result<(), ReachbackError> {
        self.notifier
            .ensure_channel(&ChannelSpec {
                id: self.channel_id.clone(),
                name: self.channel_name.clone(),
            })
            .await
    }

    /// Displays the decision prompt for a qualifying call and returns the
    /// notification id.
    pub async fn display_prompt(&self, call: &AnalyzedCall) -> Result<String, ReachbackError> {
        let id = Self::notification_id(call);

        let notification = Notification {
            id: id.clone(),
            channel_id: self.channel_id.clone(),
            title: "Was this a client?".to_string(),
            body: prompt_body(call),
            payload: payload::encode(call),
            actions: vec![
                NotificationAction {
                    id: ACTION_SEND_WHATSAPP.to_string(),
                    title: "Send WhatsApp".to_string(),
                },
                NotificationAction {
                    id: ACTION_SEND_SMS.to_string(),
                    title: "Send SMS".to_string(),
                },
                NotificationAction {
                    id: ACTION_NO_CLIENT.to_string(),
                    title: "Not a client".to_string(),
                },
            ],
        };

        self.notifier.display(notification).await?;
        info!(
            notification_id = id.as_str(),
            number = call.number.as_str(),
            kind = %call.kind,
            "client-check prompt displayed"
        );
        Ok(id)
    }

    /// Removes a prompt once it has been resolved.
    pub async fn cancel(&self, id: &str) -> Result<(), ReachbackError> {
        debug!(notification_id = id, "cancelling prompt");
        self.notifier.cancel(id).await
    }
}

/// Human-readable one-line prompt body.
fn prompt_body(call: &AnalyzedCall) -> String {
    match call.kind {
        CallKind::Missed => format!("Missed call from {}", call.number),
        CallKind::Rejected => format!("Rejected call from {}", call.number),
        CallKind::Incoming => format!("Call with {}", call.number),
        CallKind::Outgoing => format!("Call to {}", call.number),
        CallKind::Unknown => format!("Call event for {}", call.number),
    }
}

#[async_trait]
impl CallSink for NotificationGateway {
    async fn on_call(&self, call: AnalyzedCall) -> Result<(), ReachbackError> {
        self.display_prompt(&call).await.map(|_| ())
    }
}
