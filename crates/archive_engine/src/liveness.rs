use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use archive_logging::{archive_info, archive_warn};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::Backend;

#[derive(Debug, Clone)]
pub struct LivenessSettings {
    pub interval: Duration,
}

impl Default for LivenessSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
        }
    }
}

/// Precondition checked before a batch may touch the backend.
pub trait LivenessGate: Send + Sync {
    fn is_reachable(&self) -> bool;
}

/// Last known reachability of the backend, refreshed by a periodic probe.
///
/// Starts out unreachable until the first probe succeeds.
#[derive(Debug, Clone, Default)]
pub struct LivenessMonitor {
    reachable: Arc<AtomicBool>,
}

impl LivenessMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs one health check and records the result.
    pub async fn probe(&self, backend: &dyn Backend) -> bool {
        let result = backend.health().await;
        let online = result.is_ok();
        let previous = self.reachable.swap(online, Ordering::Relaxed);
        if previous != online {
            match result {
                Ok(()) => archive_info!("backend is online"),
                Err(err) => archive_warn!("backend is offline: {}", err),
            }
        }
        online
    }

    /// Probes immediately, then every `settings.interval`, until `cancel`
    /// fires. `on_probe` sees every result.
    pub async fn run<F>(
        self,
        backend: Arc<dyn Backend>,
        settings: LivenessSettings,
        cancel: CancellationToken,
        on_probe: F,
    ) where
        F: Fn(bool) + Send + 'static,
    {
        let mut ticker = tokio::time::interval(settings.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    let online = self.probe(backend.as_ref()).await;
                    on_probe(online);
                }
            }
        }
    }
}

impl LivenessGate for LivenessMonitor {
    fn is_reachable(&self) -> bool {
        self.reachable.load(Ordering::Relaxed)
    }
}
