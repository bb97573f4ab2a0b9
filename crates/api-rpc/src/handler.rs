//! RPC Method Handlers
//!
//! Thin adapters from JSON-RPC params to `MaintenanceService` calls.

use crate::error::to_rpc_error;
use crate::types::{
    AuthStatusResponse, CatalogResponse, DeleteAllResponse, DeleteRecordRequest,
    DisableAllResponse, HistoryRequest, ListRecordsRequest, ListRecordsResponse, PendingReminder,
    PendingRemindersResponse, SetReminderRequest,
};
use carcare_core::application::{
    AddRecordRequest, MaintenanceService, RecordChange, ReminderOutcome, StatusReport,
    TypeHistory, UpdateRecordRequest,
};
use carcare_core::error::AppError;
use jsonrpsee::types::ErrorObjectOwned;
use std::sync::Arc;
use tracing::debug;

type RpcResult<T> = Result<T, ErrorObjectOwned>;

/// RPC Handler with injected dependencies
pub struct RpcHandler {
    service: Arc<MaintenanceService>,
}

impl RpcHandler {
    pub fn new(service: Arc<MaintenanceService>) -> Self {
        Self { service }
    }

    /// records.add.v1
    pub async fn add_record(&self, params: AddRecordRequest) -> RpcResult<RecordChange> {
        debug!(maintenance_type = %params.maintenance_type, "records.add");
        self.service.add_record(params).await.map_err(to_rpc_error)
    }

    /// records.list.v1
    pub async fn list_records(&self, params: ListRecordsRequest) -> RpcResult<ListRecordsResponse> {
        let mut records = self.service.list_records().await;
        if let Some(filter) = params.maintenance_type {
            records.retain(|r| r.maintenance_type == filter);
        }
        Ok(ListRecordsResponse { records })
    }

    /// records.update.v1
    pub async fn update_record(&self, params: UpdateRecordRequest) -> RpcResult<RecordChange> {
        debug!(record_id = %params.id, "records.update");
        self.service.update_record(params).await.map_err(to_rpc_error)
    }

    /// records.delete.v1
    pub async fn delete_record(&self, params: DeleteRecordRequest) -> RpcResult<RecordChange> {
        debug!(record_id = %params.id, "records.delete");
        self.service
            .delete_record(&params.id)
            .await
            .map_err(to_rpc_error)
    }

    /// records.delete_all.v1
    ///
    /// A wipe also withdraws every pending reminder so none outlives its record.
    pub async fn delete_all(&self) -> RpcResult<DeleteAllResponse> {
        let deleted = self.service.delete_all().await.map_err(to_rpc_error)?;
        self.service
            .disable_all_reminders()
            .await
            .map_err(to_rpc_error)?;
        Ok(DeleteAllResponse { deleted })
    }

    /// records.history.v1
    pub async fn history(&self, params: HistoryRequest) -> RpcResult<TypeHistory> {
        Ok(self.service.history(params.maintenance_type).await)
    }

    /// status.get.v1
    pub async fn status(&self) -> RpcResult<StatusReport> {
        Ok(self.service.status_report().await)
    }

    /// reminders.set.v1
    ///
    /// A toggle refused in Denied/Ephemeral is an error here; the flag is already persisted off.
    pub async fn set_reminder(&self, params: SetReminderRequest) -> RpcResult<RecordChange> {
        debug!(record_id = %params.id, enabled = params.enabled, "reminders.set");
        let change = self
            .service
            .set_reminder(&params.id, params.enabled)
            .await
            .map_err(to_rpc_error)?;

        if change.reminder == ReminderOutcome::SettingsRequired {
            let state = self.service.authorization_state();
            return Err(to_rpc_error(AppError::PermissionDenied(state)));
        }
        Ok(change)
    }

    /// reminders.disable_all.v1
    pub async fn disable_all_reminders(&self) -> RpcResult<DisableAllResponse> {
        let disabled = self
            .service
            .disable_all_reminders()
            .await
            .map_err(to_rpc_error)?;
        Ok(DisableAllResponse { disabled })
    }

    /// reminders.pending.v1
    pub async fn pending_reminders(&self) -> RpcResult<PendingRemindersResponse> {
        let ids = self
            .service
            .pending_reminders()
            .await
            .map_err(to_rpc_error)?;
        Ok(PendingRemindersResponse {
            reminders: ids.into_iter().map(PendingReminder::from_identifier).collect(),
        })
    }

    /// auth.status.v1
    pub async fn auth_status(&self) -> RpcResult<AuthStatusResponse> {
        Ok(self.service.authorization_state().into())
    }

    /// auth.request.v1
    pub async fn auth_request(&self) -> RpcResult<AuthStatusResponse> {
        let state = self
            .service
            .request_authorization()
            .await
            .map_err(to_rpc_error)?;
        Ok(state.into())
    }

    /// catalog.list.v1
    pub async fn catalog(&self) -> RpcResult<CatalogResponse> {
        Ok(CatalogResponse {
            vehicle: self.service.vehicle(),
            entries: self.service.catalog(),
        })
    }
}
