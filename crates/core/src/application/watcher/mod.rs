// Authorization Watcher - Polls the dispatcher's permission state
// Lets the daemon notice permission changes made outside the app (e.g. revocation).

mod shutdown;

pub use shutdown::{shutdown_channel, ShutdownSender, ShutdownToken};

use crate::application::constants::MIN_AUTH_POLL_INTERVAL;
use crate::application::maintenance::MaintenanceService;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info};

pub struct AuthorizationWatcher {
    service: Arc<MaintenanceService>,
    poll_interval: Duration,
}

impl AuthorizationWatcher {
    /// # Arguments
    /// * `service` - Orchestration service whose gate is refreshed
    /// * `poll_interval` - Time between polls (clamped to at least 1s)
    pub fn new(service: Arc<MaintenanceService>, poll_interval: Duration) -> Self {
        Self {
            service,
            poll_interval: poll_interval.max(MIN_AUTH_POLL_INTERVAL),
        }
    }

    /// Run the polling loop until shutdown (spawn in tokio::spawn)
    pub async fn run(self, mut shutdown: ShutdownToken) {
        info!(
            poll_interval_secs = self.poll_interval.as_secs(),
            "Authorization watcher started"
        );

        let mut tick = interval(self.poll_interval);
        tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // First tick completes immediately; the initial state is observed at startup
        tick.tick().await;

        loop {
            tokio::select! {
                _ = tick.tick() => {}
                _ = shutdown.wait() => break,
            }

            match self.service.refresh_authorization().await {
                Ok(update) => debug!(state = %update.state, "Authorization polled"),
                Err(e) => error!(error = %e, "Authorization poll failed"),
            }
        }

        info!("Authorization watcher stopped");
    }
}
