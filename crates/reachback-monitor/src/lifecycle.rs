// SPDX-FileCopyrightText: 2026 Reachback Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Monitoring lifecycle state machine.
//!
//! Phases: Stopped -> Starting -> Active -> Stopping -> Stopped.
//! The phase is set synchronously under one lock acquisition before any
//! await, so a second concurrent `start_monitoring` observes `Starting` and
//! no-ops — the native source `start()` runs exactly once per transition.
//! Permission denial and native start/stop failures are caught and logged;
//! the machine always resolves to a terminal phase rather than hanging
//! between states.

use std::sync::Arc;

use reachback_core::{
    CallEventSource, PermissionGate, PermissionStatus, ReachbackError,
};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

/// Phases of the monitoring lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecyclePhase {
    /// Monitoring is off; the native source is not running.
    Stopped,
    /// A start is in flight (permission resolution / native start).
    Starting,
    /// The native source is running and events flow to the ingest loop.
    Active,
    /// A stop is in flight.
    Stopping,
}

impl std::fmt::Display for LifecyclePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LifecyclePhase::Stopped => write!(f, "stopped"),
            LifecyclePhase::Starting => write!(f, "starting"),
            LifecyclePhase::Active => write!(f, "active"),
            LifecyclePhase::Stopping => write!(f, "stopping"),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct LifecycleState {
    phase: LifecyclePhase,
    permission: PermissionStatus,
}

/// Orchestrates permission acquisition and start/stop of the native source.
pub struct MonitorLifecycle {
    source: Arc<dyn CallEventSource>,
    permissions: Arc<dyn PermissionGate>,
    state: Mutex<LifecycleState>,
}

impl MonitorLifecycle {
    /// Creates a lifecycle controller in the `Stopped` phase.
    pub fn new(source: Arc<dyn CallEventSource>, permissions: Arc<dyn PermissionGate>) -> Self {
        Self {
            source,
            permissions,
            state: Mutex::new(LifecycleState {
                phase: LifecyclePhase::Stopped,
                permission: PermissionStatus::Checking,
            }),
        }
    }

    /// Returns the current lifecycle phase.
    pub async fn phase(&self) -> LifecyclePhase {
        self.state.lock().await.phase
    }

    /// Returns the last observed permission status.
    pub async fn permission_status(&self) -> PermissionStatus {
        self.state.lock().await.permission
    }

    /// Starts monitoring: resolves the call-log permission, then starts the
    /// native source. A no-op unless the lifecycle is `Stopped`.
    pub async fn start_monitoring(&self) -> Result<(), ReachbackError> {
        {
            let mut state = self.state.lock().await;
            if state.phase != LifecyclePhase::Stopped {
                debug!(phase = %state.phase, "start_monitoring ignored");
                return Ok(());
            }
            state.phase = LifecyclePhase::Starting;
            state.permission = PermissionStatus::Checking;
        }

        let granted = self.resolve_permission().await;
        if !granted {
            warn!("call-log permission denied, directing user to system settings");
            self.permissions.open_settings().await;
            let mut state = self.state.lock().await;
            state.phase = LifecyclePhase::Stopped;
            state.permission = PermissionStatus::Denied;
            return Ok(());
        }

        {
            let mut state = self.state.lock().await;
            state.permission = PermissionStatus::Granted;
        }

        match self.source.start().await {
            Ok(()) => {
                self.state.lock().await.phase = LifecyclePhase::Active;
                info!("call monitoring active");
            }
            Err(e) => {
                error!(error = %e, "native call source failed to start");
                self.state.lock().await.phase = LifecyclePhase::Stopped;
            }
        }

        Ok(())
    }

    /// Stops monitoring. A no-op unless the lifecycle is `Active`; safe to
    /// call while a start is still in flight.
    pub async fn stop_monitoring(&self) -> Result<(), ReachbackError> {
        {
            let mut state = self.state.lock().await;
            if state.phase != LifecyclePhase::Active {
                debug!(phase = %state.phase, "stop_monitoring ignored");
                return Ok(());
            }
            state.phase = LifecyclePhase::Stopping;
        }

        if let Err(e) = self.source.stop().await {
            error!(error = %e, "native call source failed to stop");
        }
        self.state.lock().await.phase = LifecyclePhase::Stopped;
        info!("call monitoring stopped");

        Ok(())
    }

    /// Resolves the permission to a grant decision: an existing grant wins,
    /// otherwise the gate prompts once. Gate failures count as denial.
    async fn resolve_permission(&self) -> bool {
        match self.permissions.check().await {
            Ok(PermissionStatus::Granted) => true,
            Ok(_) => match self.permissions.request().await {
                Ok(granted) => granted,
                Err(e) => {
                    warn!(error = %e, "permission request failed");
                    false
                }
            },
            Err(e) => {
                warn!(error = %e, "permission check failed");
                false
            }
        }
    }
}
