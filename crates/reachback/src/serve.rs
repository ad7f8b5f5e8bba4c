// SPDX-FileCopyrightText: 2026 Reachback Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `reachback serve` command implementation.
//!
//! Wires the persisted store, the follow-up API client, the stdio host
//! bridge, the monitoring lifecycle, and the two event loops (ingest and
//! action), then runs until SIGINT with a graceful shutdown: stop
//! monitoring, cancel the loops, checkpoint the store.

use std::sync::Arc;
use std::time::Duration;

use reachback_api::RestApiClient;
use reachback_config::model::ReachbackConfig;
use reachback_core::{Adapter, ReachbackError, StateStore};
use reachback_dispatch::MessagingDispatcher;
use reachback_monitor::{IngestLoop, MonitorLifecycle};
use reachback_notify::NotificationGateway;
use reachback_pipeline::{ActionHandler, ActionLoop};
use reachback_store::SqliteStateStore;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::bridge::{
    BridgeCallSource, BridgeInner, BridgeNotifier, BridgePermissionGate, BridgeWriter,
    ExecOpener,
};

/// Initializes the tracing subscriber from the configured log level.
///
/// `RUST_LOG` overrides the config value when set.
pub fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_string()));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Runs the `reachback serve` command.
pub async fn run_serve(config: ReachbackConfig) -> Result<(), ReachbackError> {
    init_tracing(&config.service.log_level);

    info!(service = config.service.name.as_str(), "starting reachback serve");

    // Persisted monitoring state.
    let store = Arc::new(SqliteStateStore::new(config.storage.clone()));
    store.initialize().await?;

    // Follow-up service client. Without a session token the background
    // pipeline fails closed on every action.
    let api = Arc::new(RestApiClient::new(&config.api)?);
    if config.api.session_token.is_none() {
        warn!("no session token configured -- background actions will fail closed");
    }

    // Stdio host bridge: call source, notifier, permission gate.
    let inner = BridgeInner::new();
    let writer = BridgeWriter::new();
    let reader_task = inner.spawn_stdin_reader();
    let source = Arc::new(BridgeCallSource::new(inner.clone(), writer.clone()));
    let notifier = Arc::new(BridgeNotifier::new(inner.clone(), writer.clone()));
    let permissions = Arc::new(BridgePermissionGate::new(inner, writer));

    // Notification gateway doubles as the ingest loop's call sink.
    let gateway = Arc::new(NotificationGateway::new(notifier.clone(), &config.notify));
    gateway.ensure_channel().await?;

    // Lifecycle: permission acquisition + native source start.
    let lifecycle = Arc::new(MonitorLifecycle::new(source.clone(), permissions));
    lifecycle.start_monitoring().await?;

    // Background pipeline.
    let dispatcher = Arc::new(MessagingDispatcher::new(Arc::new(ExecOpener)));
    let handler = Arc::new(ActionHandler::new(
        api,
        store.clone(),
        dispatcher,
        notifier.clone(),
        config.api.role.clone(),
        Duration::from_secs(config.pipeline.step_timeout_secs),
    ));

    let cancel = CancellationToken::new();

    let ingest = IngestLoop::new(
        source,
        gateway.clone(),
        store.clone(),
        config.monitor.clone(),
    );
    let ingest_cancel = cancel.clone();
    let ingest_task = tokio::spawn(async move { ingest.run(ingest_cancel).await });

    let action_loop = ActionLoop::new(notifier, handler);
    let action_cancel = cancel.clone();
    let action_task = tokio::spawn(async move { action_loop.run(action_cancel).await });

    // Run until SIGINT.
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("SIGINT received, shutting down"),
        Err(e) => error!(error = %e, "failed to listen for shutdown signal"),
    }

    // Graceful shutdown: stop the native source first so no new events
    // arrive, then cancel the loops and flush the store.
    lifecycle.stop_monitoring().await?;
    cancel.cancel();

    if let Err(e) = ingest_task.await {
        error!(error = %e, "ingest task join failed");
    }
    if let Err(e) = action_task.await {
        error!(error = %e, "action task join failed");
    }
    reader_task.abort();

    store.shutdown().await?;
    info!("reachback stopped");
    Ok(())
}
