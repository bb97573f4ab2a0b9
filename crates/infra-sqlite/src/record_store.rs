// SQLite RecordStore Implementation

use crate::error::{map_load_error, map_save_error};
use async_trait::async_trait;
use carcare_core::domain::{MaintenanceRecord, MaintenanceType};
use carcare_core::port::{LoadError, RecordStore, SaveError};
use chrono::NaiveDate;
use sqlx::SqlitePool;
use tracing::{debug, warn};

const DATE_FORMAT: &str = "%Y-%m-%d";

pub struct SqliteRecordStore {
    pool: SqlitePool,
}

impl SqliteRecordStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore for SqliteRecordStore {
    async fn load_all(&self) -> Result<Vec<MaintenanceRecord>, LoadError> {
        let rows: Vec<RecordRow> = sqlx::query_as(
            r#"
            SELECT id, maintenance_type, performed_on, reminder_enabled, custom_frequency_days
            FROM maintenance_records
            ORDER BY performed_on ASC, id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_load_error)?;

        let records = rows
            .into_iter()
            .map(RecordRow::into_record)
            .collect::<Result<Vec<_>, _>>()?;

        debug!(count = records.len(), "Loaded maintenance records");
        Ok(records)
    }

    async fn insert(&self, record: &MaintenanceRecord) -> Result<(), SaveError> {
        sqlx::query(
            r#"
            INSERT INTO maintenance_records (
                id, maintenance_type, performed_on, reminder_enabled, custom_frequency_days
            ) VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.id)
        .bind(record.maintenance_type.tag())
        .bind(record.performed_on.format(DATE_FORMAT).to_string())
        .bind(record.reminder_enabled)
        .bind(record.custom_frequency_days.map(i64::from))
        .execute(&self.pool)
        .await
        .map_err(map_save_error)?;

        Ok(())
    }

    async fn update(&self, record: &MaintenanceRecord) -> Result<(), SaveError> {
        // Type and date are immutable once created
        let result = sqlx::query(
            r#"
            UPDATE maintenance_records
            SET reminder_enabled = ?, custom_frequency_days = ?
            WHERE id = ?
            "#,
        )
        .bind(record.reminder_enabled)
        .bind(record.custom_frequency_days.map(i64::from))
        .bind(&record.id)
        .execute(&self.pool)
        .await
        .map_err(map_save_error)?;

        if result.rows_affected() == 0 {
            return Err(SaveError::SaveFailed(format!(
                "record {} does not exist",
                record.id
            )));
        }
        Ok(())
    }

    async fn delete_one(&self, record: &MaintenanceRecord) -> Result<(), SaveError> {
        let result = sqlx::query("DELETE FROM maintenance_records WHERE id = ?")
            .bind(&record.id)
            .execute(&self.pool)
            .await
            .map_err(map_save_error)?;

        if result.rows_affected() == 0 {
            warn!(record_id = %record.id, "Deleted record was not in the store");
        }
        Ok(())
    }

    async fn delete_all(&self) -> Result<(), SaveError> {
        let result = sqlx::query("DELETE FROM maintenance_records")
            .execute(&self.pool)
            .await
            .map_err(map_save_error)?;

        debug!(deleted = result.rows_affected(), "Deleted all maintenance records");
        Ok(())
    }
}

/// SQLite row representation
#[derive(Debug, sqlx::FromRow)]
struct RecordRow {
    id: String,
    maintenance_type: String,
    performed_on: String,
    reminder_enabled: bool,
    custom_frequency_days: Option<i64>,
}

impl RecordRow {
    fn into_record(self) -> Result<MaintenanceRecord, LoadError> {
        let performed_on = NaiveDate::parse_from_str(&self.performed_on, DATE_FORMAT).map_err(|e| {
            LoadError::ValidationFailed(format!(
                "record {}: bad date {:?}: {}",
                self.id, self.performed_on, e
            ))
        })?;

        let custom_frequency_days = match self.custom_frequency_days {
            None => None,
            Some(days) => match u32::try_from(days) {
                Ok(days) if days > 0 => Some(days),
                _ => {
                    return Err(LoadError::ValidationFailed(format!(
                        "record {}: custom frequency {} out of range",
                        self.id, days
                    )))
                }
            },
        };

        // Unrecognised tags load as Unknown (never due) instead of failing the whole load
        let maintenance_type = MaintenanceType::from_tag(&self.maintenance_type);

        let mut record = MaintenanceRecord::new(self.id, maintenance_type, performed_on)
            .with_reminder(self.reminder_enabled);
        if maintenance_type.is_schedulable() {
            record.custom_frequency_days = custom_frequency_days;
        }
        Ok(record)
    }
}
