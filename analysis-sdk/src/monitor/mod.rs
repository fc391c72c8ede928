//! Connectivity monitor
//!
//! A best-effort health probe. The outcome is a plain connected/disconnected
//! flag: any failure, including a timeout or a reachable server reporting
//! anything other than `"running"`, counts as disconnected.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{debug, info, warn};
use tokio::task::JoinHandle;

use crate::core::{Endpoint, Transport};
use crate::error::Result;
use crate::schema::{decode_json, HealthResponse};

/// Process-wide connectivity flag.
///
/// Cloning shares the flag. Only `ConnectivityMonitor` writes it; everyone
/// else reads.
#[derive(Debug, Clone, Default)]
pub struct HealthState {
    connected: Arc<AtomicBool>,
}

impl HealthState {
    /// A fresh, disconnected flag
    pub fn new() -> Self {
        Self::default()
    }

    /// Result of the most recent completed probe; false before any probe
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    /// Store a probe result, returning the previous value
    fn set(&self, connected: bool) -> bool {
        self.connected.swap(connected, Ordering::AcqRel)
    }
}

/// Runs health probes and publishes the result into a `HealthState`
pub struct ConnectivityMonitor {
    transport: Arc<dyn Transport>,
    state: HealthState,
}

impl ConnectivityMonitor {
    /// Create a monitor with its own flag
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self::with_state(transport, HealthState::new())
    }

    /// Create a monitor writing into an existing flag
    pub fn with_state(transport: Arc<dyn Transport>, state: HealthState) -> Self {
        Self { transport, state }
    }

    /// Read handle on the flag this monitor writes
    pub fn state(&self) -> HealthState {
        self.state.clone()
    }

    /// Raw health call, errors included
    pub async fn check(&self) -> Result<HealthResponse> {
        let endpoint = Endpoint::Health;
        let json = self.transport.call(endpoint, endpoint.method(), None).await?;
        decode_json(json)
    }

    /// Probe the server and update the flag. Never fails.
    pub async fn probe(&self) -> bool {
        let connected = match self.check().await {
            Ok(health) if health.is_running() => true,
            Ok(health) => {
                warn!(
                    "Analysis server at {} reachable but not running (status {:?})",
                    self.transport.base_url(),
                    health.status
                );
                false
            }
            Err(e) => {
                warn!("Health probe against {} failed: {}", self.transport.base_url(), e);
                false
            }
        };

        let previous = self.state.set(connected);
        if previous != connected {
            info!(
                "Analysis server {}",
                if connected { "connected" } else { "disconnected" }
            );
        } else {
            debug!("Health probe finished, connected = {}", connected);
        }

        connected
    }

    /// Run the startup probe on the runtime without blocking the caller.
    ///
    /// The returned handle resolves to the probe result once the flag has
    /// been updated.
    pub fn spawn_startup_probe(self: &Arc<Self>) -> JoinHandle<bool> {
        let monitor = Arc::clone(self);
        tokio::spawn(async move { monitor.probe().await })
    }
}
