//! Background task that closes idle booking sessions.
//!
//! Runs in a tokio::spawn loop, sweeping the registry every
//! `sweep_interval` and dropping sessions idle for longer than `max_idle`.

use tokio::task::JoinHandle;
use tokio::time::Duration;
use tracing::{debug, info};

use crate::shared::shutdown::ShutdownSignal;

use super::registry::SharedSessionRegistry;

/// Start the idle-session eviction task.
pub fn start_session_eviction_task(
    registry: SharedSessionRegistry,
    shutdown: ShutdownSignal,
    sweep_interval: Duration,
    max_idle: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(
            sweep_interval_secs = sweep_interval.as_secs(),
            max_idle_secs = max_idle.as_secs(),
            "🧹 Session eviction task started"
        );

        let mut interval = tokio::time::interval(sweep_interval);
        let notified = shutdown.notified();
        tokio::pin!(notified);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let evicted = registry.evict_idle(max_idle);
                    if evicted > 0 {
                        info!(evicted, remaining = registry.count(), "Evicted idle booking sessions");
                    } else {
                        debug!(remaining = registry.count(), "No idle sessions to evict");
                    }
                }
                _ = &mut notified => {
                    info!("🧹 Session eviction task shutting down");
                    break;
                }
            }
        }

        info!("🧹 Session eviction task stopped");
    })
}
