// Status Engine
// Pure derivation of per-type and overall urgency from the record history

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{latest_of_type, MaintenanceRecord, MaintenanceType, UrgencyStatus, VehicleKind};

/// Classify elapsed days against a frequency.
///
/// Uses `3·d < f` and `3·d < 2·f` so the 1/3 and 2/3 boundaries are exact;
/// a boundary value belongs to the upper bracket. `d` is clamped to `[0, f]`.
pub fn classify(elapsed_days: i64, frequency_days: u32) -> UrgencyStatus {
    debug_assert!(frequency_days > 0, "classify called with zero frequency");

    let f = i64::from(frequency_days);
    let d = elapsed_days.clamp(0, f);

    if 3 * d < f {
        UrgencyStatus::UpToDate
    } else if 3 * d < 2 * f {
        UrgencyStatus::DueSoon
    } else {
        UrgencyStatus::Due
    }
}

/// Status of one type, `None` for types that never come due.
/// A type with no history is `Due`.
pub fn status_for_type(
    maintenance_type: MaintenanceType,
    records: &[MaintenanceRecord],
    today: NaiveDate,
) -> Option<UrgencyStatus> {
    if !maintenance_type.is_schedulable() {
        return None;
    }

    let Some(latest) = latest_of_type(records, maintenance_type) else {
        return Some(UrgencyStatus::Due);
    };

    let frequency = latest.effective_frequency_days();
    debug_assert!(
        frequency > 0,
        "schedulable type {} has no frequency",
        maintenance_type
    );

    let elapsed = (today - latest.performed_on).num_days();
    Some(classify(elapsed, frequency))
}

/// Types present in `records`, minus the catch-all and anything inapplicable
/// to the vehicle. Sorted by tag.
pub fn active_types(records: &[MaintenanceRecord], vehicle: VehicleKind) -> Vec<MaintenanceType> {
    let mut types: Vec<MaintenanceType> = records
        .iter()
        .map(|r| r.maintenance_type)
        .filter(|t| t.is_schedulable() && t.applies_to(vehicle))
        .collect();
    types.sort_by_key(|t| t.tag());
    types.dedup();
    types
}

/// Worst status across active types. No records at all is `Due`.
pub fn overall_status(
    records: &[MaintenanceRecord],
    vehicle: VehicleKind,
    today: NaiveDate,
) -> UrgencyStatus {
    if records.is_empty() {
        return UrgencyStatus::Due;
    }

    active_types(records, vehicle)
        .into_iter()
        .filter_map(|t| status_for_type(t, records, today))
        .max()
        .unwrap_or(UrgencyStatus::UpToDate)
}

/// Summary of one active type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeStatus {
    pub maintenance_type: MaintenanceType,
    pub status: UrgencyStatus,
    pub last_record_id: String,
    pub last_performed: NaiveDate,
    pub frequency_days: u32,
    pub next_due: NaiveDate,
    /// Negative when overdue
    pub days_until_due: i64,
    pub days_since_last: i64,
    pub reminder_enabled: bool,
}

/// Status of the whole log at a given day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReport {
    pub today: NaiveDate,
    pub vehicle: VehicleKind,
    pub overall: UrgencyStatus,
    pub record_count: usize,
    pub types: Vec<TypeStatus>,
}

/// Build the full report
pub fn status_report(
    records: &[MaintenanceRecord],
    vehicle: VehicleKind,
    today: NaiveDate,
) -> StatusReport {
    let types = active_types(records, vehicle)
        .into_iter()
        .filter_map(|t| type_status(t, records, today))
        .collect();

    StatusReport {
        today,
        vehicle,
        overall: overall_status(records, vehicle, today),
        record_count: records.len(),
        types,
    }
}

fn type_status(
    maintenance_type: MaintenanceType,
    records: &[MaintenanceRecord],
    today: NaiveDate,
) -> Option<TypeStatus> {
    let latest = latest_of_type(records, maintenance_type)?;
    let status = status_for_type(maintenance_type, records, today)?;
    let next_due = latest.next_due_date()?;

    Some(TypeStatus {
        maintenance_type,
        status,
        last_record_id: latest.id.clone(),
        last_performed: latest.performed_on,
        frequency_days: latest.effective_frequency_days(),
        next_due,
        days_until_due: (next_due - today).num_days(),
        days_since_last: (today - latest.performed_on).num_days(),
        reminder_enabled: latest.reminder_enabled,
    })
}
