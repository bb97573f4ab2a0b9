// Central Error Type for the Application

use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    #[error("Domain error: {0}")]
    Domain(#[from] crate::domain::DomainError),

    #[error("Record store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Failed to load records: {0}")]
    Load(#[from] crate::port::LoadError),

    #[error("Failed to save record: {0}")]
    Save(#[from] crate::port::SaveError),

    #[error("Validation error: {0}")]
    Validation(String),

    /// Terminal permission state; the user must change it in system settings
    #[error("Notification permission denied ({0})")]
    PermissionDenied(crate::domain::AuthorizationState),

    #[error("Permission request failed: {0}")]
    PermissionRequestFailed(String),

    #[error("Scheduling error: {0}")]
    Scheduling(#[from] crate::port::DispatchError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

// Note: sqlx::Error conversion is handled in infra-sqlite crate
// by mapping onto LoadError / SaveError
