//! RPC Error Types
//!
//! Maps application errors to stable JSON-RPC error codes.

use carcare_core::error::AppError;
use jsonrpsee::types::ErrorObjectOwned;

/// RPC Error Codes: 4xxx client/permission, 5xxx store/scheduling/internal
pub mod code {
    pub const VALIDATION_ERROR: i32 = 4000;
    pub const NOT_FOUND: i32 = 4001;
    pub const PERMISSION_DENIED: i32 = 4002;
    pub const PERMISSION_REQUEST_FAILED: i32 = 4003;
    pub const INTERNAL_ERROR: i32 = 5000;
    pub const STORE_ERROR: i32 = 5001;
    pub const SCHEDULING_ERROR: i32 = 5002;
}

/// Convert AppError to JSON-RPC ErrorObject
pub fn to_rpc_error(err: AppError) -> ErrorObjectOwned {
    let message = err.to_string();
    match err {
        AppError::Validation(_) | AppError::Domain(_) => {
            ErrorObjectOwned::owned(code::VALIDATION_ERROR, message, None::<()>)
        }
        AppError::NotFound(_) => ErrorObjectOwned::owned(code::NOT_FOUND, message, None::<()>),
        AppError::PermissionDenied(state) => {
            ErrorObjectOwned::owned(code::PERMISSION_DENIED, message, Some(state))
        }
        AppError::PermissionRequestFailed(_) => {
            ErrorObjectOwned::owned(code::PERMISSION_REQUEST_FAILED, message, None::<()>)
        }
        AppError::StoreUnavailable(_) | AppError::Load(_) | AppError::Save(_) => {
            ErrorObjectOwned::owned(code::STORE_ERROR, message, None::<()>)
        }
        AppError::Scheduling(_) => {
            ErrorObjectOwned::owned(code::SCHEDULING_ERROR, message, None::<()>)
        }
        AppError::Config(_) | AppError::Unknown(_) => {
            ErrorObjectOwned::owned(code::INTERNAL_ERROR, message, None::<()>)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carcare_core::domain::{AuthorizationState, DomainError};
    use carcare_core::port::{DispatchError, LoadError, SaveError};

    #[test]
    fn test_client_errors_are_4xxx() {
        assert_eq!(
            to_rpc_error(AppError::Validation("bad".into())).code(),
            code::VALIDATION_ERROR
        );
        assert_eq!(
            to_rpc_error(DomainError::InvalidFrequency(0).into()).code(),
            code::VALIDATION_ERROR
        );
        assert_eq!(
            to_rpc_error(AppError::NotFound("r1".into())).code(),
            code::NOT_FOUND
        );
    }

    #[test]
    fn test_permission_denied_carries_state() {
        let err = to_rpc_error(AppError::PermissionDenied(AuthorizationState::Denied));
        assert_eq!(err.code(), code::PERMISSION_DENIED);
        assert_eq!(err.data().map(|d| d.get()), Some("\"DENIED\""));
    }

    #[test]
    fn test_store_and_scheduling_errors_are_5xxx() {
        for err in [
            AppError::StoreUnavailable("locked".into()),
            LoadError::SchemaIncompatible("v9".into()).into(),
            SaveError::SaveFailed("disk full".into()).into(),
        ] {
            assert_eq!(to_rpc_error(err).code(), code::STORE_ERROR);
        }
        assert_eq!(
            to_rpc_error(DispatchError::Unavailable("gone".into()).into()).code(),
            code::SCHEDULING_ERROR
        );
        assert_eq!(
            to_rpc_error(AppError::Unknown("?".into())).code(),
            code::INTERNAL_ERROR
        );
    }
}
