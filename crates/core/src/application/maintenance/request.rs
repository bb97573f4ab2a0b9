// Maintenance use case requests and results

use crate::application::status::TypeStatus;
use crate::domain::{
    tiers_for, DomainError, MaintenanceRecord, MaintenanceType, UrgencyStatus, VehicleKind,
};
use crate::error::{AppError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Log a completed task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddRecordRequest {
    pub maintenance_type: MaintenanceType,
    pub performed_on: NaiveDate,

    /// Defaults to whether reminders are currently permitted
    #[serde(default)]
    pub reminder_enabled: Option<bool>,

    #[serde(default)]
    pub custom_frequency_days: Option<u32>,
}

/// Change the mutable fields of a record
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateRecordRequest {
    pub id: String,

    #[serde(default)]
    pub reminder_enabled: Option<bool>,

    #[serde(default)]
    pub custom_frequency_days: Option<u32>,

    /// Drop the override and fall back to the catalog frequency
    #[serde(default)]
    pub clear_custom_frequency: bool,
}

/// What happened to a type's reminders after a change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ReminderOutcome {
    /// Reconciled; `count` notifications are pending for the type
    Scheduled { count: usize },
    /// Reminders are off for the type and nothing is pending
    Cancelled,
    /// Next due date is not in the future, nothing scheduled
    Overdue,
    /// The type never comes due
    NoDueDate,
    /// Permission is Denied or Ephemeral: the flag was forced off and only
    /// system settings can change that
    SettingsRequired,
    /// Permission has not been asked yet: the flag was forced off
    AuthorizationRequired,
}

/// Result of a record mutation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordChange {
    pub record: MaintenanceRecord,
    pub overall: UrgencyStatus,
    /// Status of the affected type, `None` when it never comes due
    pub type_status: Option<UrgencyStatus>,
    pub reminder: ReminderOutcome,
}

/// One catalog entry as offered to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub maintenance_type: MaintenanceType,
    pub display_name: String,
    pub icon_key: String,
    pub base_frequency_days: u32,
    pub reminder_tiers_days: Vec<u32>,
}

impl CatalogEntry {
    pub fn from_type(maintenance_type: MaintenanceType) -> Self {
        Self {
            maintenance_type,
            display_name: maintenance_type.display_name().to_string(),
            icon_key: maintenance_type.icon_key().to_string(),
            base_frequency_days: maintenance_type.base_frequency_days(),
            reminder_tiers_days: tiers_for(maintenance_type.base_frequency_days())
                .iter()
                .map(|t| t.offset_days())
                .collect(),
        }
    }
}

/// History of one type, most recent first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeHistory {
    pub maintenance_type: MaintenanceType,
    pub status: Option<TypeStatus>,
    pub records: Vec<MaintenanceRecord>,
}

/// Validate an add request against the vehicle and today's date
pub fn validate_add(req: &AddRecordRequest, vehicle: VehicleKind, today: NaiveDate) -> Result<()> {
    if !req.maintenance_type.applies_to(vehicle) {
        return Err(DomainError::InapplicableType(req.maintenance_type.tag().to_string()).into());
    }

    if req.performed_on > today {
        return Err(AppError::Validation(format!(
            "performed date {} is in the future",
            req.performed_on
        )));
    }

    if req.custom_frequency_days == Some(0) {
        return Err(DomainError::InvalidFrequency(0).into());
    }

    Ok(())
}

/// Validate an update request
pub fn validate_update(req: &UpdateRecordRequest) -> Result<()> {
    if req.id.trim().is_empty() {
        return Err(AppError::Validation("record id cannot be empty".to_string()));
    }

    if req.clear_custom_frequency && req.custom_frequency_days.is_some() {
        return Err(AppError::Validation(
            "cannot set and clear the custom frequency at once".to_string(),
        ));
    }

    if req.custom_frequency_days == Some(0) {
        return Err(DomainError::InvalidFrequency(0).into());
    }

    Ok(())
}
