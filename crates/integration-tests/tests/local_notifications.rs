//! Full stack with the local notification center
//!
//! SQLite store + LocalNotificationCenter + file-backed permission. The
//! permission file plays the role of the OS settings screen.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use carcare_core::application::{
    AddRecordRequest, AuthorizationGate, MaintenanceService, RecordLedger, ReminderOutcome,
    ReminderScheduler,
};
use carcare_core::domain::{AuthorizationState, MaintenanceType, VehicleKind};
use carcare_core::port::id_provider::mocks::SequentialIdProvider;
use carcare_core::port::time_provider::mocks::FixedTimeProvider;
use carcare_core::port::NotificationDispatcher;
use carcare_infra_sqlite::{create_pool, run_migrations, SqliteRecordStore};
use carcare_infra_system::{DeliverySink, LocalNotificationCenter, PermissionStore, PromptAnswer};
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, TimeZone};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
}

fn at(hour: u32, minute: u32, second: u32) -> DateTime<FixedOffset> {
    FixedOffset::east_opt(0)
        .unwrap()
        .with_ymd_and_hms(2025, 3, 1, hour, minute, second)
        .unwrap()
}

fn permission_path() -> PathBuf {
    std::env::temp_dir()
        .join(format!("carcare-it-{}", uuid::Uuid::new_v4()))
        .join("permission.json")
}

struct Stack {
    service: MaintenanceService,
    center: Arc<LocalNotificationCenter>,
    permission_path: PathBuf,
}

async fn boot(now: DateTime<FixedOffset>, answer: PromptAnswer) -> Stack {
    let pool = create_pool("sqlite::memory:").await.unwrap();
    run_migrations(&pool).await.unwrap();

    let clock = Arc::new(FixedTimeProvider::new(now));
    let ledger = Arc::new(RecordLedger::new(Arc::new(SqliteRecordStore::new(pool))));
    ledger.load().await.unwrap();

    let permission_path = permission_path();
    let center = Arc::new(LocalNotificationCenter::new(
        clock.clone(),
        PermissionStore::new(&permission_path, answer),
        DeliverySink::Log,
    ));
    let scheduler = Arc::new(ReminderScheduler::new(
        center.clone(),
        clock.clone(),
        ledger.clone(),
    ));
    let (gate, initial) = AuthorizationGate::connect(center.clone()).await.unwrap();
    let service = MaintenanceService::new(
        ledger,
        scheduler,
        Arc::new(gate),
        Arc::new(SequentialIdProvider::new()),
        clock,
        VehicleKind::Manual,
    );
    service.handle_gate_update(initial).await.unwrap();

    Stack {
        service,
        center,
        permission_path,
    }
}

fn add(t: MaintenanceType, performed_on: NaiveDate, remind: Option<bool>) -> AddRecordRequest {
    AddRecordRequest {
        maintenance_type: t,
        performed_on,
        reminder_enabled: remind,
        custom_frequency_days: None,
    }
}

#[tokio::test]
async fn test_first_run_asks_before_scheduling() {
    let stack = boot(at(12, 0, 0), PromptAnswer::Grant).await;
    assert_eq!(
        stack.service.authorization_state(),
        AuthorizationState::NotDetermined
    );

    // No explicit flag: defaults to off while permission is undecided
    let change = stack
        .service
        .add_record(add(MaintenanceType::ReplaceChain, today(), None))
        .await
        .unwrap();
    assert!(!change.record.reminder_enabled);
    assert!(stack.center.list_pending().await.unwrap().is_empty());

    let refused = stack
        .service
        .set_reminder(&change.record.id, true)
        .await
        .unwrap();
    assert_eq!(refused.reminder, ReminderOutcome::AuthorizationRequired);

    let state = stack.service.request_authorization().await.unwrap();
    assert_eq!(state, AuthorizationState::Authorized);

    let granted = stack
        .service
        .set_reminder(&change.record.id, true)
        .await
        .unwrap();
    assert_eq!(granted.reminder, ReminderOutcome::Scheduled { count: 2 });
    assert_eq!(stack.center.list_pending().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_denied_prompt_requires_settings() {
    let stack = boot(at(12, 0, 0), PromptAnswer::Deny).await;
    let state = stack.service.request_authorization().await.unwrap();
    assert_eq!(state, AuthorizationState::Denied);

    let change = stack
        .service
        .add_record(add(MaintenanceType::ReplaceChain, today(), Some(true)))
        .await
        .unwrap();
    assert_eq!(change.reminder, ReminderOutcome::SettingsRequired);
    assert!(!change.record.reminder_enabled);
    assert!(stack.center.list_pending().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_revocation_in_settings_cancels_everything() {
    let stack = boot(at(12, 0, 0), PromptAnswer::Grant).await;
    stack.service.request_authorization().await.unwrap();
    stack
        .service
        .add_record(add(MaintenanceType::ReplaceChain, today(), Some(true)))
        .await
        .unwrap();
    stack
        .service
        .add_record(add(MaintenanceType::ReplaceTires, today(), Some(true)))
        .await
        .unwrap();
    assert_eq!(stack.center.list_pending().await.unwrap().len(), 4);

    // User flips the switch outside the app
    PermissionStore::new(&stack.permission_path, PromptAnswer::Grant)
        .write(AuthorizationState::Denied)
        .await
        .unwrap();
    let update = stack.service.refresh_authorization().await.unwrap();

    assert_eq!(update.state, AuthorizationState::Denied);
    assert!(stack.center.list_pending().await.unwrap().is_empty());
    assert!(stack
        .service
        .list_records()
        .await
        .iter()
        .all(|r| !r.reminder_enabled));
}

#[tokio::test]
async fn test_due_notification_is_delivered_and_leaves_pending() {
    // 300ms before the 09:00 fire time
    let now = at(9, 0, 0) - Duration::milliseconds(300);
    let stack = boot(now, PromptAnswer::Grant).await;
    stack.service.request_authorization().await.unwrap();

    // Weekly check performed 5 days ago: due in 2 days, the 2-day tier fires today
    let change = stack
        .service
        .add_record(add(MaintenanceType::CheckTirePressure, today() - Duration::days(5), Some(true)))
        .await
        .unwrap();
    assert_eq!(change.reminder, ReminderOutcome::Scheduled { count: 1 });
    assert_eq!(stack.center.list_pending().await.unwrap().len(), 1);

    tokio::time::sleep(StdDuration::from_millis(1500)).await;
    assert!(stack.center.list_pending().await.unwrap().is_empty());
}
