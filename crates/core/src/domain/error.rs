// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid custom frequency: {0} days (must be positive)")]
    InvalidFrequency(u32),

    #[error("Maintenance type {0} does not apply to this vehicle")]
    InapplicableType(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

pub type Result<T> = std::result::Result<T, DomainError>;
