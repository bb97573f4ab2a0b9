// Application Layer - Use Cases and Business Logic

pub mod authorization;
pub mod constants;
pub mod ledger;
pub mod maintenance;
pub mod reminder;
pub mod status;
pub mod watcher;

// Re-exports
pub use authorization::{AuthorizationGate, GateUpdate};
pub use ledger::RecordLedger;
pub use maintenance::{
    AddRecordRequest, CatalogEntry, MaintenanceService, RecordChange, ReminderOutcome,
    TypeHistory, UpdateRecordRequest,
};
pub use reminder::{ReconcileReport, ReminderScheduler, ScheduledReminder};
pub use status::{StatusReport, TypeStatus};
pub use watcher::{shutdown_channel, AuthorizationWatcher, ShutdownSender, ShutdownToken};
