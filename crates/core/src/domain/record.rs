// Maintenance Record Domain Model

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::error::{DomainError, Result};
use crate::domain::maintenance_type::MaintenanceType;

/// Record ID (UUID v4, assigned at creation)
pub type RecordId = String;

/// A completed maintenance task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaintenanceRecord {
    pub id: RecordId,
    pub maintenance_type: MaintenanceType,
    /// Calendar date the task was completed (immutable)
    pub performed_on: NaiveDate,
    pub reminder_enabled: bool,
    /// Overrides the catalog frequency when set
    pub custom_frequency_days: Option<u32>,
}

impl MaintenanceRecord {
    /// Create a record with reminders off and the catalog frequency
    ///
    /// # Arguments
    ///
    /// * `id` - Unique record ID (injected, not generated)
    /// * `maintenance_type` - Task type
    /// * `performed_on` - Completion date
    pub fn new(
        id: impl Into<String>,
        maintenance_type: MaintenanceType,
        performed_on: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            maintenance_type,
            performed_on,
            reminder_enabled: false,
            custom_frequency_days: None,
        }
    }

    pub fn with_reminder(mut self, enabled: bool) -> Self {
        self.reminder_enabled = enabled;
        self
    }

    pub fn with_custom_frequency(mut self, days: Option<u32>) -> Result<Self> {
        self.set_custom_frequency(days)?;
        Ok(self)
    }

    /// Replace the custom frequency override
    pub fn set_custom_frequency(&mut self, days: Option<u32>) -> Result<()> {
        match days {
            Some(0) => Err(DomainError::InvalidFrequency(0)),
            Some(_) if !self.maintenance_type.is_schedulable() => {
                Err(DomainError::ValidationError(format!(
                    "{} cannot carry a custom frequency",
                    self.maintenance_type
                )))
            }
            _ => {
                self.custom_frequency_days = days;
                Ok(())
            }
        }
    }

    /// Custom override if set and positive, else the catalog frequency.
    /// Always 0 for `Unknown`.
    pub fn effective_frequency_days(&self) -> u32 {
        if !self.maintenance_type.is_schedulable() {
            return 0;
        }
        match self.custom_frequency_days {
            Some(days) if days > 0 => days,
            _ => self.maintenance_type.base_frequency_days(),
        }
    }

    /// Date the task is due again, `None` when the type never comes due
    pub fn next_due_date(&self) -> Option<NaiveDate> {
        match self.effective_frequency_days() {
            0 => None,
            days => self.performed_on.checked_add_days(Days::new(u64::from(days))),
        }
    }
}

/// Most recent record of a type. Equal dates fall back to the larger id.
pub fn latest_of_type(
    records: &[MaintenanceRecord],
    maintenance_type: MaintenanceType,
) -> Option<&MaintenanceRecord> {
    records
        .iter()
        .filter(|r| r.maintenance_type == maintenance_type)
        .max_by(|a, b| {
            a.performed_on
                .cmp(&b.performed_on)
                .then_with(|| a.id.cmp(&b.id))
        })
}
