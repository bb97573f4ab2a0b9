// Reminder Scheduler
// Reconciles a type's pending notifications against its next due date.
// Reconciliation is a full replace: cancel everything the type owns, then recreate.

use crate::application::constants::REMINDER_HOUR;
use crate::application::ledger::RecordLedger;
use crate::domain::notification::is_owned_by;
use crate::domain::{tiers_for, MaintenanceType, NotificationRequest, ReminderTier};
use crate::error::Result;
use crate::port::{NotificationDispatcher, TimeProvider};
use chrono::{DateTime, Days, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock, RwLockReadGuard};
use tracing::{debug, info, warn};

/// A notification handed to the dispatcher
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledReminder {
    pub identifier: String,
    pub tier: ReminderTier,
    pub fire_at: DateTime<FixedOffset>,
}

/// Result of one reconciliation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileReport {
    pub scheduled: Vec<ScheduledReminder>,
    /// Tiers whose fire instant is not in the future
    pub skipped: Vec<ReminderTier>,
    /// Tiers the dispatcher rejected
    pub failed: Vec<ReminderTier>,
}

pub struct ReminderScheduler {
    dispatcher: Arc<dyn NotificationDispatcher>,
    time_provider: Arc<dyn TimeProvider>,
    ledger: Arc<RecordLedger>,
    type_locks: Mutex<HashMap<MaintenanceType, Arc<Mutex<()>>>>,
    /// Shared by check-then-reconcile sequences, exclusive for `cancel_all`
    sweep: RwLock<()>,
}

impl ReminderScheduler {
    pub fn new(
        dispatcher: Arc<dyn NotificationDispatcher>,
        time_provider: Arc<dyn TimeProvider>,
        ledger: Arc<RecordLedger>,
    ) -> Self {
        Self {
            dispatcher,
            time_provider,
            ledger,
            type_locks: Mutex::new(HashMap::new()),
            sweep: RwLock::new(()),
        }
    }

    /// Hold while checking permission and reconciling, so a concurrent `cancel_all`
    /// runs either before the check or after the last schedule call.
    /// Must not be held across `cancel_all`.
    pub async fn permit(&self) -> RwLockReadGuard<'_, ()> {
        self.sweep.read().await
    }

    /// Replace the type's pending notifications with the tiers still ahead of `next_due`.
    ///
    /// The caller must have checked that the authorization gate permits scheduling.
    /// Nothing happens when `next_due` is not strictly after today. A rejected tier
    /// does not stop the others.
    pub async fn reconcile(
        &self,
        maintenance_type: MaintenanceType,
        next_due: NaiveDate,
    ) -> Result<ReconcileReport> {
        let lock = self.type_lock(maintenance_type).await;
        let _guard = lock.lock().await;

        let now = self.time_provider.now();
        let mut report = ReconcileReport::default();

        if !maintenance_type.is_schedulable() || next_due <= now.date_naive() {
            debug!(
                maintenance_type = %maintenance_type,
                next_due = %next_due,
                "Next due date not in the future, skipping reconciliation"
            );
            return Ok(report);
        }

        let cancelled = self.cancel_owned(maintenance_type).await?;

        for &tier in tiers_for(maintenance_type.base_frequency_days()) {
            let Some(fire_at) = self.fire_instant(next_due, tier) else {
                report.skipped.push(tier);
                continue;
            };

            if fire_at <= now {
                debug!(
                    maintenance_type = %maintenance_type,
                    tier_days = tier.offset_days(),
                    fire_at = %fire_at,
                    "Tier already elapsed"
                );
                report.skipped.push(tier);
                continue;
            }

            let request = NotificationRequest::new(maintenance_type, tier, fire_at);
            let identifier = request.identifier.clone();
            match self.dispatcher.schedule(request).await {
                Ok(()) => {
                    debug!(identifier = %identifier, fire_at = %fire_at, "Reminder scheduled");
                    report.scheduled.push(ScheduledReminder {
                        identifier,
                        tier,
                        fire_at,
                    });
                }
                Err(e) => {
                    warn!(
                        maintenance_type = %maintenance_type,
                        tier_days = tier.offset_days(),
                        error = %e,
                        "Failed to schedule reminder tier"
                    );
                    report.failed.push(tier);
                }
            }
        }

        info!(
            maintenance_type = %maintenance_type,
            next_due = %next_due,
            cancelled,
            scheduled = report.scheduled.len(),
            skipped = report.skipped.len(),
            failed = report.failed.len(),
            "Reminders reconciled"
        );
        Ok(report)
    }

    /// Remove every pending notification owned by the type
    pub async fn cancel(&self, maintenance_type: MaintenanceType) -> Result<usize> {
        let lock = self.type_lock(maintenance_type).await;
        let _guard = lock.lock().await;

        let cancelled = self.cancel_owned(maintenance_type).await?;
        info!(maintenance_type = %maintenance_type, cancelled, "Reminders cancelled");
        Ok(cancelled)
    }

    /// Remove every pending notification and turn every reminder flag off
    pub async fn cancel_all(&self) -> Result<usize> {
        let _sweep = self.sweep.write().await;
        self.dispatcher.cancel_all().await?;
        let disabled = self.ledger.disable_all_reminders().await?;
        info!(disabled, "All reminders cancelled");
        Ok(disabled)
    }

    /// Identifiers of every pending notification
    pub async fn pending(&self) -> Result<Vec<String>> {
        let mut pending = self.dispatcher.list_pending().await?;
        pending.sort();
        Ok(pending)
    }

    /// 09:00 local on `next_due - tier.offset_days`
    fn fire_instant(&self, next_due: NaiveDate, tier: ReminderTier) -> Option<DateTime<FixedOffset>> {
        let day = next_due.checked_sub_days(Days::new(u64::from(tier.offset_days())))?;
        let local = day.and_hms_opt(REMINDER_HOUR, 0, 0)?;
        self.time_provider.at_local(local)
    }

    async fn cancel_owned(&self, maintenance_type: MaintenanceType) -> Result<usize> {
        let owned: Vec<String> = self
            .dispatcher
            .list_pending()
            .await?
            .into_iter()
            .filter(|id| is_owned_by(id, maintenance_type))
            .collect();

        if !owned.is_empty() {
            self.dispatcher.cancel(&owned).await?;
        }
        Ok(owned.len())
    }

    async fn type_lock(&self, maintenance_type: MaintenanceType) -> Arc<Mutex<()>> {
        let mut locks = self.type_locks.lock().await;
        locks.entry(maintenance_type).or_default().clone()
    }
}
