// SPDX-FileCopyrightText: 2026 Reachback Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The background decision pipeline.
//!
//! Runs on action-press events delivered by the notification port,
//! independent of whether the foreground lifecycle is running. Every branch
//! terminates by cancelling the notification or by an explicit no-effect
//! outcome; each remote step carries a timeout so the handler resolves
//! within the host's bounded background execution window.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use reachback_core::{
    ActionEvent, AnalyzedCall, ChannelKind, FollowupApi, Notifier, PromptAction,
    ReachbackError, StateStore,
};
use reachback_dispatch::MessagingDispatcher;
use reachback_notify::decode_payload;
use tracing::{debug, error, info, warn};

use crate::templates::{select_primary, FALLBACK_MESSAGE};

/// Terminal outcome of one action-press event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// No authenticated session: fail-closed, prompt cancelled, nothing else.
    Unauthenticated,
    /// Payload missing, malformed, or carrying a foreign tag: no effect.
    MalformedPayload,
    /// Number appended to the blacklist, prompt cancelled.
    Blacklisted,
    /// Follow-up dispatched and ledger updated, prompt cancelled.
    Sent {
        channel: ChannelKind,
        used_fallback: bool,
    },
    /// Templates fetched cleanly but none is primary for this call kind:
    /// no writes, no dispatch, prompt cancelled.
    NoPrimaryTemplate,
    /// Plain tap or unrecognized action id: no state mutation.
    Ignored,
}

/// Executes the decision pipeline for notification action events.
pub struct ActionHandler {
    api: Arc<dyn FollowupApi>,
    store: Arc<dyn StateStore>,
    dispatcher: Arc<MessagingDispatcher>,
    notifier: Arc<dyn Notifier>,
    role: String,
    step_timeout: Duration,
}

impl ActionHandler {
    /// Creates a handler over the injected ports.
    pub fn new(
        api: Arc<dyn FollowupApi>,
        store: Arc<dyn StateStore>,
        dispatcher: Arc<MessagingDispatcher>,
        notifier: Arc<dyn Notifier>,
        role: String,
        step_timeout: Duration,
    ) -> Self {
        Self {
            api,
            store,
            dispatcher,
            notifier,
            role,
            step_timeout,
        }
    }

    /// Handles one action-press event to a terminal outcome.
    ///
    /// Never returns an error: every failure inside the pipeline is logged
    /// and folded into the outcome so the host callback always resolves.
    pub async fn handle(&self, event: &ActionEvent) -> Outcome {
        // Fail closed: never act on behalf of a logged-out installation.
        if !self.api.is_authenticated().await {
            warn!(
                notification_id = event.notification_id.as_str(),
                "no authenticated session, cancelling prompt"
            );
            self.cancel(&event.notification_id).await;
            return Outcome::Unauthenticated;
        }

        let Some(call) = event.payload.as_deref().and_then(decode_payload) else {
            debug!(
                notification_id = event.notification_id.as_str(),
                "event without decodable call payload"
            );
            return Outcome::MalformedPayload;
        };

        let action = event.action_id.as_deref().and_then(PromptAction::from_action_id);
        match action {
            Some(PromptAction::NotClient) => {
                self.handle_not_client(&event.notification_id, &call).await
            }
            Some(PromptAction::Send(channel)) => {
                self.handle_send(&event.notification_id, &call, channel).await
            }
            None => {
                debug!(
                    notification_id = event.notification_id.as_str(),
                    action_id = event.action_id.as_deref().unwrap_or("<tap>"),
                    "ignoring unrecognized action"
                );
                Outcome::Ignored
            }
        }
    }

    async fn handle_not_client(&self, notification_id: &str, call: &AnalyzedCall) -> Outcome {
        match self.timed(self.store.blacklist_add(&call.number)).await {
            Ok(()) => {
                info!(number = call.number.as_str(), "number blacklisted");
            }
            Err(e) => {
                error!(error = %e, number = call.number.as_str(), "blacklist append failed");
            }
        }
        self.cancel(notification_id).await;
        Outcome::Blacklisted
    }

    async fn handle_send(
        &self,
        notification_id: &str,
        call: &AnalyzedCall,
        channel: ChannelKind,
    ) -> Outcome {
        // A fetch failure is transient: the follow-up must still reach the
        // user, so the pipeline continues with the fixed fallback message.
        let templates = match self.timed(self.api.fetch_templates(&self.role)).await {
            Ok(templates) => Some(templates),
            Err(e) => {
                warn!(error = %e, "template fetch failed, using fallback message");
                None
            }
        };

        let message = match &templates {
            Some(templates) => match select_primary(templates, call.kind) {
                Some(template) => {
                    // Only a primary match triggers the audit writes.
                    self.write_audit_logs(call, &template.description).await;
                    template.description.clone()
                }
                None => {
                    // A clean fetch with no primary skips writes and
                    // dispatch entirely; the prompt still resolves.
                    debug!(kind = %call.kind, "no primary template, skipping dispatch");
                    self.cancel(notification_id).await;
                    return Outcome::NoPrimaryTemplate;
                }
            },
            None => FALLBACK_MESSAGE.to_string(),
        };

        let dispatched = match self
            .timed(self.dispatcher.send(channel, &call.number, &message))
            .await
        {
            Ok(()) => true,
            Err(e) => {
                error!(
                    error = %e,
                    channel = %channel,
                    number = call.number.as_str(),
                    "dispatch failed"
                );
                false
            }
        };

        if dispatched {
            let now = chrono::Utc::now().timestamp_millis();
            if let Err(e) = self.timed(self.store.record_sent(&call.number, now)).await {
                warn!(error = %e, "sent-ledger update failed");
            }
        }

        self.cancel(notification_id).await;

        info!(
            notification_id,
            channel = %channel,
            number = call.number.as_str(),
            dispatched,
            used_fallback = templates.is_none(),
            "send action resolved"
        );
        Outcome::Sent {
            channel,
            used_fallback: templates.is_none(),
        }
    }

    /// Writes the remote call-log and message-sent records. Both are audit
    /// trails: failures are logged and the pipeline continues.
    async fn write_audit_logs(&self, call: &AnalyzedCall, message: &str) {
        if let Err(e) = self.timed(self.api.record_call(call)).await {
            warn!(error = %e, "call-log write failed");
        }

        let now = chrono::Utc::now().timestamp_millis();
        if let Err(e) = self
            .timed(self.api.record_message_sent(&call.number, message, now))
            .await
        {
            warn!(error = %e, "message-log write failed");
        }
    }

    /// Cancels the notification: the idempotent close signal that prevents
    /// re-processing of a resolved call.
    async fn cancel(&self, notification_id: &str) {
        if let Err(e) = self.timed(self.notifier.cancel(notification_id)).await {
            warn!(error = %e, notification_id, "prompt cancel failed");
        }
    }

    /// Bounds a pipeline step by the configured step timeout.
    async fn timed<T>(
        &self,
        fut: impl Future<Output = Result<T, ReachbackError>>,
    ) -> Result<T, ReachbackError> {
        match tokio::time::timeout(self.step_timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(ReachbackError::Timeout {
                duration: self.step_timeout,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reachback_config::model::StorageConfig;
    use reachback_core::{CallKind, MessageTemplate, StateStore};
    use reachback_notify::encode_payload;
    use reachback_store::SqliteStateStore;
    use reachback_test_utils::{MockApi, MockNotifier, MockOpener};
    use tempfile::tempdir;

    struct Harness {
        api: Arc<MockApi>,
        store: Arc<SqliteStateStore>,
        opener: Arc<MockOpener>,
        notifier: Arc<MockNotifier>,
        handler: ActionHandler,
        _dir: tempfile::TempDir,
    }

    async fn harness() -> Harness {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("pipeline.db");
        let store = Arc::new(SqliteStateStore::new(StorageConfig {
            database_path: db_path.to_str().unwrap().to_string(),
            wal_mode: true,
        }));
        store.initialize().await.unwrap();

        let api = Arc::new(MockApi::new());
        let opener = Arc::new(MockOpener::new());
        let notifier = Arc::new(MockNotifier::new());
        let handler = ActionHandler::new(
            api.clone(),
            store.clone(),
            Arc::new(MessagingDispatcher::new(opener.clone())),
            notifier.clone(),
            "agent".to_string(),
            Duration::from_millis(250),
        );

        Harness {
            api,
            store,
            opener,
            notifier,
            handler,
            _dir: dir,
        }
    }

    fn call() -> AnalyzedCall {
        AnalyzedCall {
            kind: CallKind::Missed,
            number: "+911234567890".into(),
            duration_seconds: 0,
            timestamp_millis: 1000,
        }
    }

    fn event(action_id: Option<&str>) -> ActionEvent {
        ActionEvent {
            notification_id: "client_check_1000".into(),
            action_id: action_id.map(String::from),
            payload: Some(encode_payload(&call())),
        }
    }

    fn missed_template(description: &str) -> MessageTemplate {
        MessageTemplate {
            id: "t1".into(),
            template_type: "missed".into(),
            description: description.into(),
            is_primary: true,
        }
    }

    #[tokio::test]
    async fn unauthenticated_fails_closed() {
        let h = harness().await;
        h.api.set_authenticated(false);

        let outcome = h.handler.handle(&event(Some("send_whatsapp"))).await;
        assert_eq!(outcome, Outcome::Unauthenticated);
        assert_eq!(h.notifier.cancelled(), vec!["client_check_1000".to_string()]);
        assert!(h.opener.opened().is_empty());
        assert!(h.store.blacklist_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_payload_is_nonfatal() {
        let h = harness().await;
        let mut ev = event(Some("send_whatsapp"));
        ev.payload = None;

        assert_eq!(h.handler.handle(&ev).await, Outcome::MalformedPayload);
        assert!(h.notifier.cancelled().is_empty());
        assert!(h.opener.opened().is_empty());
    }

    #[tokio::test]
    async fn foreign_payload_tag_is_nonfatal() {
        let h = harness().await;
        let mut ev = event(Some("send_whatsapp"));
        ev.payload = Some(r#"{"tag":"other","call":{}}"#.to_string());

        assert_eq!(h.handler.handle(&ev).await, Outcome::MalformedPayload);
    }

    #[tokio::test]
    async fn no_client_blacklists_and_cancels() {
        let h = harness().await;

        let outcome = h.handler.handle(&event(Some("no_client"))).await;
        assert_eq!(outcome, Outcome::Blacklisted);
        assert!(h.store.blacklist_contains("+911234567890").await.unwrap());
        assert_eq!(h.notifier.cancelled().len(), 1);
        assert!(h.opener.opened().is_empty(), "no channel may be invoked");
    }

    #[tokio::test]
    async fn send_whatsapp_with_primary_template() {
        let h = harness().await;
        h.api.set_templates(vec![missed_template("We missed you!")]);

        let outcome = h.handler.handle(&event(Some("send_whatsapp"))).await;
        assert_eq!(
            outcome,
            Outcome::Sent {
                channel: ChannelKind::Whatsapp,
                used_fallback: false
            }
        );

        // Audit writes happened before dispatch.
        assert_eq!(h.api.recorded_calls().len(), 1);
        let messages = h.api.recorded_messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].0, "+911234567890");
        assert_eq!(messages[0].1, "We missed you!");

        // Template text reached the channel.
        let opened = h.opener.opened();
        assert_eq!(opened.len(), 1);
        assert!(opened[0].starts_with("whatsapp://send?phone=+911234567890"));
        assert!(opened[0].contains("We%20missed%20you%21"));

        // Ledger updated, prompt resolved.
        assert!(h.store.last_sent("+911234567890").await.unwrap().is_some());
        assert_eq!(h.notifier.cancelled().len(), 1);
    }

    #[tokio::test]
    async fn send_sms_uses_the_sms_channel() {
        let h = harness().await;
        h.api.set_templates(vec![missed_template("We missed you!")]);

        let outcome = h.handler.handle(&event(Some("send_sms"))).await;
        assert_eq!(
            outcome,
            Outcome::Sent {
                channel: ChannelKind::Sms,
                used_fallback: false
            }
        );
        let opened = h.opener.opened();
        assert_eq!(opened.len(), 1);
        assert!(opened[0].starts_with("sms:+911234567890"));
    }

    #[tokio::test]
    async fn no_primary_template_skips_writes_and_dispatch() {
        let h = harness().await;
        // A template set without a primary for `missed`.
        h.api.set_templates(vec![MessageTemplate {
            id: "t1".into(),
            template_type: "missed".into(),
            description: "draft".into(),
            is_primary: false,
        }]);

        let outcome = h.handler.handle(&event(Some("send_whatsapp"))).await;
        assert_eq!(outcome, Outcome::NoPrimaryTemplate);
        assert!(h.api.recorded_calls().is_empty());
        assert!(h.api.recorded_messages().is_empty());
        assert!(h.opener.opened().is_empty());
        assert!(h.store.last_sent("+911234567890").await.unwrap().is_none());
        // The prompt still resolves.
        assert_eq!(h.notifier.cancelled().len(), 1);
    }

    #[tokio::test]
    async fn fetch_failure_dispatches_fallback_without_writes() {
        let h = harness().await;
        h.api.fail_templates();

        let outcome = h.handler.handle(&event(Some("send_whatsapp"))).await;
        assert_eq!(
            outcome,
            Outcome::Sent {
                channel: ChannelKind::Whatsapp,
                used_fallback: true
            }
        );
        assert!(h.api.recorded_calls().is_empty());
        assert!(h.api.recorded_messages().is_empty());

        let opened = h.opener.opened();
        assert_eq!(opened.len(), 1);
        assert!(opened[0].contains("Thank%20you%20for%20your%20call"));
        assert!(h.store.last_sent("+911234567890").await.unwrap().is_some());
        assert_eq!(h.notifier.cancelled().len(), 1);
    }

    #[tokio::test]
    async fn fetch_timeout_takes_the_fallback_path() {
        let h = harness().await;
        h.api.set_template_delay(Duration::from_secs(5));

        let outcome = h.handler.handle(&event(Some("send_whatsapp"))).await;
        assert_eq!(
            outcome,
            Outcome::Sent {
                channel: ChannelKind::Whatsapp,
                used_fallback: true
            }
        );
        assert_eq!(h.notifier.cancelled().len(), 1);
    }

    #[tokio::test]
    async fn audit_write_failures_do_not_block_dispatch() {
        let h = harness().await;
        h.api.set_templates(vec![missed_template("We missed you!")]);
        h.api.fail_record_call();
        h.api.fail_record_message();

        let outcome = h.handler.handle(&event(Some("send_whatsapp"))).await;
        assert!(matches!(outcome, Outcome::Sent { .. }));
        assert_eq!(h.opener.opened().len(), 1);
        assert_eq!(h.notifier.cancelled().len(), 1);
    }

    #[tokio::test]
    async fn sms_unsupported_still_cancels_without_ledger_write() {
        let h = harness().await;
        h.api.set_templates(vec![missed_template("We missed you!")]);
        h.opener.deny_prefix("sms:");

        let outcome = h.handler.handle(&event(Some("send_sms"))).await;
        assert!(matches!(outcome, Outcome::Sent { .. }));
        assert!(h.opener.opened().is_empty());
        // No successful send, no ledger entry -- but the user is not
        // re-prompted either.
        assert!(h.store.last_sent("+911234567890").await.unwrap().is_none());
        assert_eq!(h.notifier.cancelled().len(), 1);
    }

    #[tokio::test]
    async fn plain_tap_and_unknown_actions_are_ignored() {
        let h = harness().await;

        assert_eq!(h.handler.handle(&event(None)).await, Outcome::Ignored);
        assert_eq!(
            h.handler.handle(&event(Some("open_app"))).await,
            Outcome::Ignored
        );
        assert!(h.notifier.cancelled().is_empty());
        assert!(h.opener.opened().is_empty());
        assert!(h.store.blacklist_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn exactly_one_cancel_per_resolved_event() {
        let h = harness().await;
        h.api.set_templates(vec![missed_template("We missed you!")]);

        h.handler.handle(&event(Some("send_whatsapp"))).await;
        assert_eq!(h.notifier.cancelled().len(), 1);

        h.handler.handle(&event(Some("no_client"))).await;
        assert_eq!(h.notifier.cancelled().len(), 2);
    }
}
