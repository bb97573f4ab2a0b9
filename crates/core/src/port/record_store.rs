// Record Store Port (Interface)
// Durable mirror of the record collection. Schema and queries are the adapter's concern.

use crate::domain::MaintenanceRecord;
use async_trait::async_trait;
use thiserror::Error;

/// Failure while reading the store
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    #[error("stored data is incompatible with this version: {0}")]
    SchemaIncompatible(String),

    #[error("could not open the record store: {0}")]
    StoreOpenFailed(String),

    #[error("stored record failed validation: {0}")]
    ValidationFailed(String),

    #[error("{0}")]
    Unknown(String),
}

/// Failure while writing the store
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SaveError {
    #[error("write rejected by the store: {0}")]
    SaveFailed(String),

    #[error("record failed validation: {0}")]
    ValidationFailed(String),

    #[error("{0}")]
    Unknown(String),
}

/// Persistence interface for maintenance records
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Load every stored record
    async fn load_all(&self) -> Result<Vec<MaintenanceRecord>, LoadError>;

    /// Insert a new record
    async fn insert(&self, record: &MaintenanceRecord) -> Result<(), SaveError>;

    /// Overwrite the mutable fields of an existing record
    async fn update(&self, record: &MaintenanceRecord) -> Result<(), SaveError>;

    /// Delete one record
    async fn delete_one(&self, record: &MaintenanceRecord) -> Result<(), SaveError>;

    /// Delete every record
    async fn delete_all(&self) -> Result<(), SaveError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// In-memory store with optional failure injection
    #[derive(Default, Clone)]
    pub struct InMemoryRecordStore {
        records: Arc<Mutex<Vec<MaintenanceRecord>>>,
        fail_load: Arc<Mutex<Option<LoadError>>>,
        fail_save: Arc<Mutex<Option<SaveError>>>,
        update_count: Arc<Mutex<usize>>,
    }

    impl InMemoryRecordStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_records(records: Vec<MaintenanceRecord>) -> Self {
            let store = Self::default();
            *store.records.lock().unwrap() = records;
            store
        }

        pub fn fail_load_with(&self, error: LoadError) {
            *self.fail_load.lock().unwrap() = Some(error);
        }

        pub fn fail_save_with(&self, error: SaveError) {
            *self.fail_save.lock().unwrap() = Some(error);
        }

        pub fn clear_failures(&self) {
            *self.fail_load.lock().unwrap() = None;
            *self.fail_save.lock().unwrap() = None;
        }

        pub fn records(&self) -> Vec<MaintenanceRecord> {
            self.records.lock().unwrap().clone()
        }

        pub fn update_count(&self) -> usize {
            *self.update_count.lock().unwrap()
        }

        fn check_save(&self) -> Result<(), SaveError> {
            match self.fail_save.lock().unwrap().clone() {
                Some(err) => Err(err),
                None => Ok(()),
            }
        }
    }

    #[async_trait]
    impl RecordStore for InMemoryRecordStore {
        async fn load_all(&self) -> Result<Vec<MaintenanceRecord>, LoadError> {
            if let Some(err) = self.fail_load.lock().unwrap().clone() {
                return Err(err);
            }
            Ok(self.records.lock().unwrap().clone())
        }

        async fn insert(&self, record: &MaintenanceRecord) -> Result<(), SaveError> {
            self.check_save()?;
            let mut records = self.records.lock().unwrap();
            if records.iter().any(|r| r.id == record.id) {
                return Err(SaveError::ValidationFailed(format!(
                    "duplicate record id {}",
                    record.id
                )));
            }
            records.push(record.clone());
            Ok(())
        }

        async fn update(&self, record: &MaintenanceRecord) -> Result<(), SaveError> {
            self.check_save()?;
            let mut records = self.records.lock().unwrap();
            match records.iter_mut().find(|r| r.id == record.id) {
                Some(existing) => {
                    *existing = record.clone();
                    *self.update_count.lock().unwrap() += 1;
                    Ok(())
                }
                None => Err(SaveError::SaveFailed(format!("no record {}", record.id))),
            }
        }

        async fn delete_one(&self, record: &MaintenanceRecord) -> Result<(), SaveError> {
            self.check_save()?;
            self.records.lock().unwrap().retain(|r| r.id != record.id);
            Ok(())
        }

        async fn delete_all(&self) -> Result<(), SaveError> {
            self.check_save()?;
            self.records.lock().unwrap().clear();
            Ok(())
        }
    }
}
