// SPDX-FileCopyrightText: 2026 Reachback Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Action-event loop: drains the notification port into the handler.

use std::sync::Arc;

use reachback_core::{Notifier, ReachbackError};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::handler::ActionHandler;

/// Consumes action-press events and drives the decision pipeline.
pub struct ActionLoop {
    notifier: Arc<dyn Notifier>,
    handler: Arc<ActionHandler>,
}

impl ActionLoop {
    /// Creates an action loop over the notifier and handler.
    pub fn new(notifier: Arc<dyn Notifier>, handler: Arc<ActionHandler>) -> Self {
        Self { notifier, handler }
    }

    /// Runs the action loop until the cancellation token is triggered.
    pub async fn run(&self, cancel: CancellationToken) -> Result<(), ReachbackError> {
        info!("action loop running");

        loop {
            tokio::select! {
                event = self.notifier.next_action() => {
                    match event {
                        Ok(event) => {
                            let outcome = self.handler.handle(&event).await;
                            debug!(
                                notification_id = event.notification_id.as_str(),
                                outcome = ?outcome,
                                "action event resolved"
                            );
                        }
                        Err(e) => {
                            error!(error = %e, "notifier receive error");
                            // If the action stream is closed, break out of the loop.
                            if e.to_string().contains("closed") {
                                break;
                            }
                        }
                    }
                }
                _ = cancel.cancelled() => {
                    info!("shutdown signal received, stopping action loop");
                    break;
                }
            }
        }

        info!("action loop stopped");
        Ok(())
    }
}
