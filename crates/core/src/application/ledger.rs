// Record Ledger
// Authoritative in-memory record collection with the store as its durable mirror.
// Single writer: every read-modify-write runs under one async mutex, store first.

use crate::domain::{latest_of_type, MaintenanceRecord, MaintenanceType};
use crate::error::{AppError, Result};
use crate::port::RecordStore;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info};

pub struct RecordLedger {
    store: Arc<dyn RecordStore>,
    records: Mutex<Vec<MaintenanceRecord>>,
}

impl RecordLedger {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            records: Mutex::new(Vec::new()),
        }
    }

    /// Replace the in-memory collection with the store's content
    pub async fn load(&self) -> Result<usize> {
        let mut records = self.records.lock().await;
        let loaded = self.store.load_all().await.map_err(|e| {
            error!(error = %e, "Failed to load records");
            e
        })?;
        *records = loaded;
        info!(count = records.len(), "Records loaded");
        Ok(records.len())
    }

    /// Copy of the current collection
    pub async fn snapshot(&self) -> Vec<MaintenanceRecord> {
        self.records.lock().await.clone()
    }

    pub async fn get(&self, id: &str) -> Option<MaintenanceRecord> {
        self.records.lock().await.iter().find(|r| r.id == id).cloned()
    }

    /// Latest record of a type, if any
    pub async fn latest(&self, maintenance_type: MaintenanceType) -> Option<MaintenanceRecord> {
        let records = self.records.lock().await;
        latest_of_type(&records, maintenance_type).cloned()
    }

    pub async fn insert(&self, record: MaintenanceRecord) -> Result<()> {
        let mut records = self.records.lock().await;
        if records.iter().any(|r| r.id == record.id) {
            return Err(AppError::Validation(format!(
                "record {} already exists",
                record.id
            )));
        }
        self.store.insert(&record).await?;
        debug!(record_id = %record.id, maintenance_type = %record.maintenance_type, "Record inserted");
        records.push(record);
        Ok(())
    }

    /// Apply `change` to a copy of the record, persist it, then commit it in memory
    pub async fn update_with<F>(&self, id: &str, change: F) -> Result<MaintenanceRecord>
    where
        F: FnOnce(&mut MaintenanceRecord) -> Result<()> + Send,
    {
        let mut records = self.records.lock().await;
        let slot = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| AppError::NotFound(format!("record {}", id)))?;

        let mut updated = slot.clone();
        change(&mut updated)?;
        if updated == *slot {
            return Ok(updated);
        }

        self.store.update(&updated).await?;
        *slot = updated.clone();
        debug!(record_id = %id, "Record updated");
        Ok(updated)
    }

    /// Remove one record, returning it
    pub async fn delete_one(&self, id: &str) -> Result<MaintenanceRecord> {
        let mut records = self.records.lock().await;
        let index = records
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| AppError::NotFound(format!("record {}", id)))?;

        self.store.delete_one(&records[index]).await?;
        let removed = records.remove(index);
        debug!(record_id = %id, maintenance_type = %removed.maintenance_type, "Record deleted");
        Ok(removed)
    }

    /// Remove every record, returning how many were held
    pub async fn delete_all(&self) -> Result<usize> {
        let mut records = self.records.lock().await;
        self.store.delete_all().await?;
        let count = records.len();
        records.clear();
        info!(count, "All records deleted");
        Ok(count)
    }

    /// Flip every enabled reminder flag to false, persisting each change.
    ///
    /// A failed write leaves that record enabled and is reported after the
    /// remaining records have been processed.
    pub async fn disable_all_reminders(&self) -> Result<usize> {
        let mut records = self.records.lock().await;
        let mut disabled = 0;
        let mut first_error = None;

        for record in records.iter_mut().filter(|r| r.reminder_enabled) {
            let mut updated = record.clone();
            updated.reminder_enabled = false;
            match self.store.update(&updated).await {
                Ok(()) => {
                    *record = updated;
                    disabled += 1;
                }
                Err(e) => {
                    error!(record_id = %record.id, error = %e, "Failed to persist disabled reminder");
                    first_error.get_or_insert(AppError::from(e));
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(disabled),
        }
    }
}
