// Local Notification Center - In-process NotificationDispatcher
// Each pending notification is a tokio timer task keyed by identifier.

use crate::delivery::DeliverySink;
use crate::permission::PermissionStore;
use async_trait::async_trait;
use carcare_core::domain::{AuthorizationState, NotificationRequest};
use carcare_core::port::{DispatchError, NotificationDispatcher, TimeProvider};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

struct PendingEntry {
    /// Distinguishes a replaced entry from its successor with the same identifier
    seq: u64,
    handle: JoinHandle<()>,
}

type PendingMap = Arc<Mutex<HashMap<String, PendingEntry>>>;

pub struct LocalNotificationCenter {
    pending: PendingMap,
    next_seq: AtomicU64,
    time_provider: Arc<dyn TimeProvider>,
    permission: PermissionStore,
    sink: Arc<DeliverySink>,
}

impl LocalNotificationCenter {
    pub fn new(
        time_provider: Arc<dyn TimeProvider>,
        permission: PermissionStore,
        sink: DeliverySink,
    ) -> Self {
        Self {
            pending: Arc::new(Mutex::new(HashMap::new())),
            next_seq: AtomicU64::new(1),
            time_provider,
            permission,
            sink: Arc::new(sink),
        }
    }

    fn delay_until(&self, request: &NotificationRequest) -> Duration {
        let now = self.time_provider.now();
        (request.fire_at - now).to_std().unwrap_or(Duration::ZERO)
    }
}

#[async_trait]
impl NotificationDispatcher for LocalNotificationCenter {
    async fn schedule(&self, request: NotificationRequest) -> Result<(), DispatchError> {
        let delay = self.delay_until(&request);
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        let identifier = request.identifier.clone();

        // Hold the map lock across spawn so the timer cannot observe a missing entry
        let mut pending = self.pending.lock().await;

        let map = self.pending.clone();
        let sink = self.sink.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            {
                let mut pending = map.lock().await;
                match pending.get(&request.identifier) {
                    Some(entry) if entry.seq == seq => {
                        pending.remove(&request.identifier);
                    }
                    _ => return,
                }
            }

            if let Err(e) = sink.deliver(&request).await {
                warn!(identifier = %request.identifier, error = %e, "Reminder delivery failed");
            }
        });

        if let Some(previous) = pending.insert(identifier.clone(), PendingEntry { seq, handle }) {
            previous.handle.abort();
            debug!(identifier = %identifier, "Replaced pending notification");
        }

        debug!(
            identifier = %identifier,
            delay_secs = delay.as_secs(),
            "Notification scheduled"
        );
        Ok(())
    }

    async fn cancel(&self, identifiers: &[String]) -> Result<(), DispatchError> {
        let mut pending = self.pending.lock().await;
        let mut removed = 0usize;
        for id in identifiers {
            if let Some(entry) = pending.remove(id) {
                entry.handle.abort();
                removed += 1;
            }
        }
        debug!(requested = identifiers.len(), removed, "Notifications cancelled");
        Ok(())
    }

    async fn cancel_all(&self) -> Result<(), DispatchError> {
        let mut pending = self.pending.lock().await;
        let count = pending.len();
        for (_, entry) in pending.drain() {
            entry.handle.abort();
        }
        info!(count, "All pending notifications cancelled");
        Ok(())
    }

    async fn list_pending(&self) -> Result<Vec<String>, DispatchError> {
        let pending = self.pending.lock().await;
        Ok(pending.keys().cloned().collect())
    }

    async fn current_authorization(&self) -> Result<AuthorizationState, DispatchError> {
        self.permission.read().await
    }

    async fn request_authorization(&self) -> Result<bool, DispatchError> {
        let state = self.permission.read().await?;
        if !state.can_prompt() {
            // The prompt is shown at most once; later requests report the stored answer
            return Ok(state.permits_scheduling());
        }
        self.permission.prompt().await
    }
}
