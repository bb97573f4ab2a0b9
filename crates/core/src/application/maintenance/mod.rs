// Maintenance Service - Orchestration of record mutations, status and reminders
// record mutation -> status recompute -> reminder reconciliation for the affected type

pub mod request;

pub use request::{
    AddRecordRequest, CatalogEntry, RecordChange, ReminderOutcome, TypeHistory,
    UpdateRecordRequest,
};

use crate::application::authorization::{AuthorizationGate, GateUpdate};
use crate::application::ledger::RecordLedger;
use crate::application::reminder::ReminderScheduler;
use crate::application::status::{self, StatusReport};
use crate::domain::{
    AuthorizationEffect, AuthorizationState, MaintenanceRecord, MaintenanceType, VehicleKind,
};
use crate::error::Result;
use crate::port::{IdProvider, TimeProvider};
use std::sync::Arc;
use tracing::{info, warn};

pub struct MaintenanceService {
    ledger: Arc<RecordLedger>,
    scheduler: Arc<ReminderScheduler>,
    gate: Arc<AuthorizationGate>,
    id_provider: Arc<dyn IdProvider>,
    time_provider: Arc<dyn TimeProvider>,
    vehicle: VehicleKind,
}

impl MaintenanceService {
    pub fn new(
        ledger: Arc<RecordLedger>,
        scheduler: Arc<ReminderScheduler>,
        gate: Arc<AuthorizationGate>,
        id_provider: Arc<dyn IdProvider>,
        time_provider: Arc<dyn TimeProvider>,
        vehicle: VehicleKind,
    ) -> Self {
        Self {
            ledger,
            scheduler,
            gate,
            id_provider,
            time_provider,
            vehicle,
        }
    }

    pub fn vehicle(&self) -> VehicleKind {
        self.vehicle
    }

    /// Log a completed task
    pub async fn add_record(&self, req: AddRecordRequest) -> Result<RecordChange> {
        request::validate_add(&req, self.vehicle, self.time_provider.today())?;

        let reminder_enabled = req
            .reminder_enabled
            .unwrap_or_else(|| self.gate.permits_scheduling());
        let refused = if reminder_enabled { self.refusal() } else { None };

        let record = MaintenanceRecord::new(
            self.id_provider.generate_id(),
            req.maintenance_type,
            req.performed_on,
        )
        .with_reminder(reminder_enabled && refused.is_none())
        .with_custom_frequency(req.custom_frequency_days)?;

        self.ledger.insert(record.clone()).await?;
        info!(
            record_id = %record.id,
            maintenance_type = %record.maintenance_type,
            performed_on = %record.performed_on,
            "Maintenance record added"
        );

        self.finish_change(record, refused).await
    }

    /// Change the reminder flag and/or the custom frequency of a record
    pub async fn update_record(&self, req: UpdateRecordRequest) -> Result<RecordChange> {
        request::validate_update(&req)?;

        let refused = match req.reminder_enabled {
            Some(true) => self.refusal(),
            _ => None,
        };

        let record = self
            .ledger
            .update_with(&req.id, |record| {
                if let Some(enabled) = req.reminder_enabled {
                    record.reminder_enabled = enabled && refused.is_none();
                }
                if req.clear_custom_frequency {
                    record.set_custom_frequency(None)?;
                } else if req.custom_frequency_days.is_some() {
                    record.set_custom_frequency(req.custom_frequency_days)?;
                }
                Ok(())
            })
            .await?;

        self.finish_change(record, refused).await
    }

    /// Toggle reminders for the type of the given record
    pub async fn set_reminder(&self, id: &str, enabled: bool) -> Result<RecordChange> {
        self.update_record(UpdateRecordRequest {
            id: id.to_string(),
            reminder_enabled: Some(enabled),
            ..Default::default()
        })
        .await
    }

    /// Delete one record. The type's reminders then follow its latest remaining record.
    pub async fn delete_record(&self, id: &str) -> Result<RecordChange> {
        let removed = self.ledger.delete_one(id).await?;
        info!(
            record_id = %removed.id,
            maintenance_type = %removed.maintenance_type,
            "Maintenance record deleted"
        );
        let outcome = self.sync_type(removed.maintenance_type).await?;
        self.change_with(removed, outcome).await
    }

    /// Delete every record. Pending reminders are left to the caller.
    pub async fn delete_all(&self) -> Result<usize> {
        let deleted = self.ledger.delete_all().await?;
        info!(deleted, "All maintenance records deleted");
        Ok(deleted)
    }

    /// Cancel every pending reminder and turn every flag off
    pub async fn disable_all_reminders(&self) -> Result<usize> {
        self.scheduler.cancel_all().await
    }

    /// All records, most recent first
    pub async fn list_records(&self) -> Vec<MaintenanceRecord> {
        let mut records = self.ledger.snapshot().await;
        sort_most_recent_first(&mut records);
        records
    }

    /// Records of one type, most recent first
    pub async fn history(&self, maintenance_type: MaintenanceType) -> TypeHistory {
        let records = self.ledger.snapshot().await;
        let today = self.time_provider.today();
        let report = status::status_report(&records, self.vehicle, today);

        let mut of_type: Vec<_> = records
            .into_iter()
            .filter(|r| r.maintenance_type == maintenance_type)
            .collect();
        sort_most_recent_first(&mut of_type);

        TypeHistory {
            maintenance_type,
            status: report
                .types
                .into_iter()
                .find(|t| t.maintenance_type == maintenance_type),
            records: of_type,
        }
    }

    pub async fn status_report(&self) -> StatusReport {
        let records = self.ledger.snapshot().await;
        status::status_report(&records, self.vehicle, self.time_provider.today())
    }

    /// Catalog entries available for this vehicle (the catch-all excluded)
    pub fn catalog(&self) -> Vec<CatalogEntry> {
        MaintenanceType::available_for(self.vehicle)
            .into_iter()
            .filter(|t| t.is_schedulable())
            .map(CatalogEntry::from_type)
            .collect()
    }

    /// Identifiers of every pending notification
    pub async fn pending_reminders(&self) -> Result<Vec<String>> {
        self.scheduler.pending().await
    }

    pub fn authorization_state(&self) -> AuthorizationState {
        self.gate.state()
    }

    /// Prompt for permission (only from NotDetermined)
    pub async fn request_authorization(&self) -> Result<AuthorizationState> {
        let update = self.gate.request().await?;
        self.handle_gate_update(update).await?;
        Ok(update.state)
    }

    /// Re-read the permission from the dispatcher
    pub async fn refresh_authorization(&self) -> Result<GateUpdate> {
        let update = self.gate.refresh().await?;
        self.handle_gate_update(update).await?;
        Ok(update)
    }

    /// Carry out the side effect of a gate transition
    pub async fn handle_gate_update(&self, update: GateUpdate) -> Result<()> {
        if update.effect == AuthorizationEffect::CancelAll {
            warn!(state = %update.state, "Notification permission denied, disabling all reminders");
            self.scheduler.cancel_all().await?;
        }
        Ok(())
    }

    /// Reconcile every active type with at least one record whose reminder is on.
    /// Run at startup: pending notifications do not survive a restart.
    pub async fn refresh_reminders(&self) -> Result<Vec<(MaintenanceType, ReminderOutcome)>> {
        let records = self.ledger.snapshot().await;
        let mut outcomes = Vec::new();

        for maintenance_type in status::active_types(&records, self.vehicle) {
            let enabled: Vec<&str> = records
                .iter()
                .filter(|r| r.maintenance_type == maintenance_type && r.reminder_enabled)
                .map(|r| r.id.as_str())
                .collect();
            if enabled.is_empty() {
                continue;
            }

            let _permit = self.scheduler.permit().await;
            let outcome = match self.refusal() {
                Some(outcome) => {
                    for id in enabled {
                        self.force_off(id).await?;
                    }
                    outcome
                }
                None => self.reconcile_type(maintenance_type).await?,
            };
            outcomes.push((maintenance_type, outcome));
        }

        info!(types = outcomes.len(), "Reminders refreshed");
        Ok(outcomes)
    }

    /// Report a refused enable as is, otherwise sync reminders from the changed record
    async fn finish_change(
        &self,
        record: MaintenanceRecord,
        refused: Option<ReminderOutcome>,
    ) -> Result<RecordChange> {
        let outcome = match refused {
            Some(outcome) => {
                warn!(
                    record_id = %record.id,
                    state = %self.gate.state(),
                    "Reminder refused, notifications not permitted"
                );
                outcome
            }
            None => self.sync_record(&record.id).await?,
        };
        self.change_with(record, outcome).await
    }

    async fn change_with(
        &self,
        record: MaintenanceRecord,
        reminder: ReminderOutcome,
    ) -> Result<RecordChange> {
        let records = self.ledger.snapshot().await;
        let today = self.time_provider.today();
        // Reflect any flag forced off during sync
        let record = records
            .iter()
            .find(|r| r.id == record.id)
            .cloned()
            .unwrap_or(record);

        Ok(RecordChange {
            overall: status::overall_status(&records, self.vehicle, today),
            type_status: status::status_for_type(record.maintenance_type, &records, today),
            record,
            reminder,
        })
    }

    /// Follow the flag of a record that was just added or updated.
    /// Off cancels the type; on reconciles it against the type's next due date.
    async fn sync_record(&self, id: &str) -> Result<ReminderOutcome> {
        let _permit = self.scheduler.permit().await;
        // Re-read under the permit: a global disable may have run since the write
        let Some(record) = self.ledger.get(id).await else {
            return Ok(ReminderOutcome::Cancelled);
        };

        if !record.reminder_enabled {
            self.scheduler.cancel(record.maintenance_type).await?;
            return Ok(ReminderOutcome::Cancelled);
        }
        if let Some(outcome) = self.refusal() {
            self.force_off(&record.id).await?;
            return Ok(outcome);
        }
        self.reconcile_type(record.maintenance_type).await
    }

    /// Bring the type's pending notifications in line with its latest record
    async fn sync_type(&self, maintenance_type: MaintenanceType) -> Result<ReminderOutcome> {
        let _permit = self.scheduler.permit().await;
        let latest = match self.ledger.latest(maintenance_type).await {
            Some(latest) if latest.reminder_enabled => latest,
            _ => {
                self.scheduler.cancel(maintenance_type).await?;
                return Ok(ReminderOutcome::Cancelled);
            }
        };

        if let Some(outcome) = self.refusal() {
            self.force_off(&latest.id).await?;
            return Ok(outcome);
        }
        self.reconcile_type(maintenance_type).await
    }

    /// Never leave a flag on with nothing scheduled
    async fn force_off(&self, id: &str) -> Result<()> {
        self.ledger
            .update_with(id, |record| {
                record.reminder_enabled = false;
                Ok(())
            })
            .await?;
        warn!(
            record_id = %id,
            state = %self.gate.state(),
            "Reminder forced off, notifications not permitted"
        );
        Ok(())
    }

    /// Reconcile against the next due date of the type's latest record
    async fn reconcile_type(&self, maintenance_type: MaintenanceType) -> Result<ReminderOutcome> {
        let Some(next_due) = self
            .ledger
            .latest(maintenance_type)
            .await
            .and_then(|latest| latest.next_due_date())
        else {
            return Ok(ReminderOutcome::NoDueDate);
        };

        if next_due <= self.time_provider.today() {
            info!(
                maintenance_type = %maintenance_type,
                next_due = %next_due,
                "Maintenance already due, no reminders scheduled"
            );
            return Ok(ReminderOutcome::Overdue);
        }

        let report = self.scheduler.reconcile(maintenance_type, next_due).await?;
        Ok(ReminderOutcome::Scheduled {
            count: report.scheduled.len(),
        })
    }

    /// Why enabling is refused in the current gate state, `None` when permitted
    fn refusal(&self) -> Option<ReminderOutcome> {
        let state = self.gate.state();
        if state.permits_scheduling() {
            None
        } else if state.requires_settings() {
            Some(ReminderOutcome::SettingsRequired)
        } else {
            Some(ReminderOutcome::AuthorizationRequired)
        }
    }
}

fn sort_most_recent_first(records: &mut [MaintenanceRecord]) {
    records.sort_by(|a, b| {
        b.performed_on
            .cmp(&a.performed_on)
            .then_with(|| b.id.cmp(&a.id))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UrgencyStatus;
    use crate::error::AppError;
    use crate::port::id_provider::mocks::SequentialIdProvider;
    use crate::port::notification_dispatcher::mocks::MockNotificationDispatcher;
    use crate::port::record_store::mocks::InMemoryRecordStore;
    use crate::port::time_provider::mocks::FixedTimeProvider;
    use chrono::{Days, NaiveDate};
    use std::time::Duration;

    struct Harness {
        service: MaintenanceService,
        dispatcher: Arc<MockNotificationDispatcher>,
        store: Arc<InMemoryRecordStore>,
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
    }

    fn days_ago(n: u64) -> NaiveDate {
        today().checked_sub_days(Days::new(n)).unwrap()
    }

    async fn harness(state: AuthorizationState, vehicle: VehicleKind) -> Harness {
        let dispatcher = Arc::new(MockNotificationDispatcher::new(state));
        let store = Arc::new(InMemoryRecordStore::new());
        let clock = Arc::new(FixedTimeProvider::at(today(), 12, 0));
        let ledger = Arc::new(RecordLedger::new(store.clone()));
        let scheduler = Arc::new(ReminderScheduler::new(
            dispatcher.clone(),
            clock.clone(),
            ledger.clone(),
        ));
        let (gate, _) = AuthorizationGate::connect(dispatcher.clone()).await.unwrap();

        let service = MaintenanceService::new(
            ledger,
            scheduler,
            Arc::new(gate),
            Arc::new(SequentialIdProvider::new()),
            clock,
            vehicle,
        );
        Harness {
            service,
            dispatcher,
            store,
        }
    }

    fn add(t: MaintenanceType, performed_on: NaiveDate, reminder: Option<bool>) -> AddRecordRequest {
        AddRecordRequest {
            maintenance_type: t,
            performed_on,
            reminder_enabled: reminder,
            custom_frequency_days: None,
        }
    }

    #[tokio::test]
    async fn test_add_with_reminder_schedules_both_long_cycle_tiers() {
        let h = harness(AuthorizationState::Authorized, VehicleKind::Manual).await;
        let change = h
            .service
            .add_record(add(MaintenanceType::ReplaceChain, days_ago(10), Some(true)))
            .await
            .unwrap();

        assert_eq!(change.reminder, ReminderOutcome::Scheduled { count: 2 });
        assert_eq!(change.type_status, Some(UrgencyStatus::UpToDate));
        assert_eq!(change.overall, UrgencyStatus::UpToDate);
        assert_eq!(h.dispatcher.pending_ids().len(), 2);
    }

    #[tokio::test]
    async fn test_reminder_flag_defaults_to_gate_permission() {
        let h = harness(AuthorizationState::Authorized, VehicleKind::Manual).await;
        let change = h
            .service
            .add_record(add(MaintenanceType::ReplaceTires, days_ago(1), None))
            .await
            .unwrap();
        assert!(change.record.reminder_enabled);

        let h = harness(AuthorizationState::NotDetermined, VehicleKind::Manual).await;
        let change = h
            .service
            .add_record(add(MaintenanceType::ReplaceTires, days_ago(1), None))
            .await
            .unwrap();
        assert!(!change.record.reminder_enabled);
        assert_eq!(change.reminder, ReminderOutcome::Cancelled);
    }

    #[tokio::test]
    async fn test_enable_while_denied_forces_flag_off() {
        let h = harness(AuthorizationState::Denied, VehicleKind::Manual).await;
        let change = h
            .service
            .add_record(add(MaintenanceType::ReplaceChain, days_ago(10), Some(false)))
            .await
            .unwrap();

        let change = h.service.set_reminder(&change.record.id, true).await.unwrap();
        assert_eq!(change.reminder, ReminderOutcome::SettingsRequired);
        assert!(!change.record.reminder_enabled);
        assert!(!h.store.records()[0].reminder_enabled);
        assert_eq!(h.dispatcher.schedule_calls(), 0);
    }

    #[tokio::test]
    async fn test_enable_before_prompt_requires_authorization() {
        let h = harness(AuthorizationState::NotDetermined, VehicleKind::Manual).await;
        let change = h
            .service
            .add_record(add(MaintenanceType::ReplaceChain, days_ago(10), Some(false)))
            .await
            .unwrap();

        let change = h.service.set_reminder(&change.record.id, true).await.unwrap();
        assert_eq!(change.reminder, ReminderOutcome::AuthorizationRequired);
        assert_eq!(h.dispatcher.schedule_calls(), 0);

        assert_eq!(
            h.service.request_authorization().await.unwrap(),
            AuthorizationState::Authorized
        );
        let change = h.service.set_reminder(&change.record.id, true).await.unwrap();
        assert_eq!(change.reminder, ReminderOutcome::Scheduled { count: 2 });
    }

    #[tokio::test]
    async fn test_overdue_type_schedules_nothing() {
        let h = harness(AuthorizationState::Authorized, VehicleKind::Manual).await;
        let change = h
            .service
            .add_record(add(MaintenanceType::CheckTirePressure, days_ago(7), Some(true)))
            .await
            .unwrap();

        assert_eq!(change.reminder, ReminderOutcome::Overdue);
        assert_eq!(change.type_status, Some(UrgencyStatus::Due));
        assert!(h.dispatcher.pending_ids().is_empty());
    }

    #[tokio::test]
    async fn test_disabling_cancels_type() {
        let h = harness(AuthorizationState::Authorized, VehicleKind::Manual).await;
        let chain = h
            .service
            .add_record(add(MaintenanceType::ReplaceChain, days_ago(10), Some(true)))
            .await
            .unwrap();
        h.service
            .add_record(add(MaintenanceType::ReplaceTires, days_ago(10), Some(true)))
            .await
            .unwrap();

        let change = h.service.set_reminder(&chain.record.id, false).await.unwrap();
        assert_eq!(change.reminder, ReminderOutcome::Cancelled);
        assert!(h
            .dispatcher
            .pending_ids()
            .iter()
            .all(|id| id.starts_with("replace_tires-")));
    }

    #[tokio::test]
    async fn test_delete_falls_back_to_latest_remaining_record() {
        let h = harness(AuthorizationState::Authorized, VehicleKind::Manual).await;
        h.service
            .add_record(add(MaintenanceType::ReplaceChain, days_ago(100), Some(false)))
            .await
            .unwrap();
        let newest = h
            .service
            .add_record(add(MaintenanceType::ReplaceChain, days_ago(10), Some(true)))
            .await
            .unwrap();
        assert_eq!(h.dispatcher.pending_ids().len(), 2);

        // Older record has reminders off: the type is cancelled
        let change = h.service.delete_record(&newest.record.id).await.unwrap();
        assert_eq!(change.reminder, ReminderOutcome::Cancelled);
        assert!(h.dispatcher.pending_ids().is_empty());
    }

    #[tokio::test]
    async fn test_enabling_older_record_schedules_from_latest_due_date() {
        let h = harness(AuthorizationState::Authorized, VehicleKind::Manual).await;
        let older = h
            .service
            .add_record(add(MaintenanceType::ReplaceChain, days_ago(100), Some(false)))
            .await
            .unwrap();
        h.service
            .add_record(add(MaintenanceType::ReplaceChain, days_ago(10), Some(false)))
            .await
            .unwrap();

        let change = h.service.set_reminder(&older.record.id, true).await.unwrap();
        assert_eq!(change.reminder, ReminderOutcome::Scheduled { count: 2 });
        assert!(change.record.reminder_enabled);

        // Due date comes from the 10-days-ago record: 355 days out, month tier at +325
        let first = h
            .dispatcher
            .pending()
            .into_iter()
            .map(|n| n.fire_at.date_naive())
            .min()
            .unwrap();
        assert_eq!(first, today().checked_add_days(Days::new(325)).unwrap());
    }

    #[tokio::test]
    async fn test_adding_older_record_while_denied_is_refused() {
        let h = harness(AuthorizationState::Denied, VehicleKind::Manual).await;
        h.service
            .add_record(add(MaintenanceType::ReplaceChain, days_ago(10), Some(false)))
            .await
            .unwrap();

        let change = h
            .service
            .add_record(add(MaintenanceType::ReplaceChain, days_ago(100), Some(true)))
            .await
            .unwrap();
        assert_eq!(change.reminder, ReminderOutcome::SettingsRequired);
        assert!(!change.record.reminder_enabled);
        assert!(h.store.records().iter().all(|r| !r.reminder_enabled));
        assert_eq!(h.dispatcher.schedule_calls(), 0);
    }

    #[tokio::test]
    async fn test_disabling_older_record_cancels_type() {
        let h = harness(AuthorizationState::Authorized, VehicleKind::Manual).await;
        let older = h
            .service
            .add_record(add(MaintenanceType::ReplaceChain, days_ago(100), Some(true)))
            .await
            .unwrap();
        h.service
            .add_record(add(MaintenanceType::ReplaceChain, days_ago(10), Some(true)))
            .await
            .unwrap();
        assert_eq!(h.dispatcher.pending_ids().len(), 2);

        let change = h.service.set_reminder(&older.record.id, false).await.unwrap();
        assert_eq!(change.reminder, ReminderOutcome::Cancelled);
        assert!(h.dispatcher.pending_ids().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_revocation_waits_for_in_flight_reconcile() {
        let h = harness(AuthorizationState::Authorized, VehicleKind::Manual).await;
        h.dispatcher.delay_schedule(Duration::from_millis(50));
        let service = Arc::new(h.service);

        let adding = {
            let service = service.clone();
            tokio::spawn(async move {
                service
                    .add_record(add(MaintenanceType::ReplaceChain, days_ago(10), Some(true)))
                    .await
            })
        };

        // The add is now inside its first schedule call
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(h.dispatcher.schedule_calls(), 1);

        h.dispatcher.set_authorization(AuthorizationState::Denied);
        let update = service.refresh_authorization().await.unwrap();
        assert_eq!(update.effect, AuthorizationEffect::CancelAll);
        adding.await.unwrap().unwrap();

        assert_eq!(h.dispatcher.schedule_calls(), 2);
        assert!(h.dispatcher.pending_ids().is_empty());
        assert!(h.store.records().iter().all(|r| !r.reminder_enabled));
    }

    #[tokio::test]
    async fn test_delete_all_leaves_reminders_to_caller() {
        let h = harness(AuthorizationState::Authorized, VehicleKind::Manual).await;
        h.service
            .add_record(add(MaintenanceType::ReplaceChain, days_ago(10), Some(true)))
            .await
            .unwrap();

        assert_eq!(h.service.delete_all().await.unwrap(), 1);
        assert_eq!(h.service.status_report().await.overall, UrgencyStatus::Due);
        assert_eq!(h.dispatcher.pending_ids().len(), 2);

        h.service.disable_all_reminders().await.unwrap();
        assert!(h.dispatcher.pending_ids().is_empty());
    }

    #[tokio::test]
    async fn test_revocation_disables_everything() {
        let h = harness(AuthorizationState::Authorized, VehicleKind::Manual).await;
        h.service
            .add_record(add(MaintenanceType::ReplaceChain, days_ago(10), Some(true)))
            .await
            .unwrap();

        h.dispatcher.set_authorization(AuthorizationState::Denied);
        let update = h.service.refresh_authorization().await.unwrap();

        assert_eq!(update.effect, AuthorizationEffect::CancelAll);
        assert!(h.dispatcher.pending_ids().is_empty());
        assert!(h.service.list_records().await.iter().all(|r| !r.reminder_enabled));
    }

    #[tokio::test]
    async fn test_inapplicable_type_rejected() {
        let h = harness(AuthorizationState::Authorized, VehicleKind::Manual).await;
        let err = h
            .service
            .add_record(add(
                MaintenanceType::RunSoftwareAndBatteryDiagnostics,
                days_ago(1),
                None,
            ))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Domain(_)));
        assert!(h.store.records().is_empty());
    }

    #[tokio::test]
    async fn test_history_is_most_recent_first() {
        let h = harness(AuthorizationState::Authorized, VehicleKind::Manual).await;
        for n in [50, 5, 20] {
            h.service
                .add_record(add(MaintenanceType::CleanDrivetrain, days_ago(n), Some(false)))
                .await
                .unwrap();
        }

        let history = h.service.history(MaintenanceType::CleanDrivetrain).await;
        let dates: Vec<_> = history.records.iter().map(|r| r.performed_on).collect();
        assert_eq!(dates, vec![days_ago(5), days_ago(20), days_ago(50)]);
        assert_eq!(history.status.unwrap().days_since_last, 5);
    }

    #[tokio::test]
    async fn test_refresh_reminders_reconciles_enabled_types_only() {
        let h = harness(AuthorizationState::Authorized, VehicleKind::Manual).await;
        h.service
            .add_record(add(MaintenanceType::ReplaceChain, days_ago(10), Some(true)))
            .await
            .unwrap();
        h.service
            .add_record(add(MaintenanceType::ReplaceTires, days_ago(10), Some(false)))
            .await
            .unwrap();
        // Pending notifications do not survive a restart
        h.dispatcher.clear_pending();

        let outcomes = h.service.refresh_reminders().await.unwrap();
        assert_eq!(
            outcomes,
            vec![(MaintenanceType::ReplaceChain, ReminderOutcome::Scheduled { count: 2 })]
        );
    }

    #[tokio::test]
    async fn test_refresh_reminders_honours_older_enabled_record() {
        let h = harness(AuthorizationState::Authorized, VehicleKind::Manual).await;
        h.service
            .add_record(add(MaintenanceType::ReplaceChain, days_ago(100), Some(true)))
            .await
            .unwrap();
        h.service
            .add_record(add(MaintenanceType::ReplaceChain, days_ago(10), Some(false)))
            .await
            .unwrap();
        h.dispatcher.clear_pending();

        let outcomes = h.service.refresh_reminders().await.unwrap();
        assert_eq!(
            outcomes,
            vec![(MaintenanceType::ReplaceChain, ReminderOutcome::Scheduled { count: 2 })]
        );
    }
}
