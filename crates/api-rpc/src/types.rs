//! RPC Request/Response Types
//!
//! Method parameters and results. Record mutations reuse the core request
//! types (`AddRecordRequest`, `UpdateRecordRequest`) and return `RecordChange`.

use carcare_core::application::CatalogEntry;
use carcare_core::domain::notification::parse_identifier;
use carcare_core::domain::{AuthorizationState, MaintenanceRecord, MaintenanceType, VehicleKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// records.list.v1 - optional type filter
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ListRecordsRequest {
    #[serde(default)]
    pub maintenance_type: Option<MaintenanceType>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListRecordsResponse {
    pub records: Vec<MaintenanceRecord>,
}

/// records.delete.v1
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteRecordRequest {
    pub id: String,
}

/// records.delete_all.v1
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteAllResponse {
    pub deleted: usize,
}

/// records.history.v1
#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryRequest {
    pub maintenance_type: MaintenanceType,
}

/// reminders.set.v1
#[derive(Debug, Serialize, Deserialize)]
pub struct SetReminderRequest {
    pub id: String,
    pub enabled: bool,
}

/// reminders.disable_all.v1
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisableAllResponse {
    pub disabled: usize,
}

/// One pending notification, decoded from its identifier when possible
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingReminder {
    pub identifier: String,
    pub maintenance_type: Option<MaintenanceType>,
    pub tier_days: Option<u32>,
    pub fire_at: Option<DateTime<Utc>>,
}

impl PendingReminder {
    pub fn from_identifier(identifier: String) -> Self {
        match parse_identifier(&identifier) {
            Some((maintenance_type, tier, timestamp)) => Self {
                maintenance_type: Some(maintenance_type),
                tier_days: Some(tier.offset_days()),
                fire_at: DateTime::from_timestamp(timestamp, 0),
                identifier,
            },
            None => Self {
                identifier,
                maintenance_type: None,
                tier_days: None,
                fire_at: None,
            },
        }
    }
}

/// reminders.pending.v1
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingRemindersResponse {
    pub reminders: Vec<PendingReminder>,
}

/// auth.status.v1 / auth.request.v1
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthStatusResponse {
    pub state: AuthorizationState,
    pub permits_scheduling: bool,
    pub requires_settings: bool,
}

impl From<AuthorizationState> for AuthStatusResponse {
    fn from(state: AuthorizationState) -> Self {
        Self {
            state,
            permits_scheduling: state.permits_scheduling(),
            requires_settings: state.requires_settings(),
        }
    }
}

/// catalog.list.v1
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogResponse {
    pub vehicle: VehicleKind,
    pub entries: Vec<CatalogEntry>,
}
