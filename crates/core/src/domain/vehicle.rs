// Vehicle Domain Model

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::domain::error::DomainError;

/// Kind of vehicle the maintenance log belongs to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleKind {
    #[default]
    Manual,
    Electric,
}

impl std::fmt::Display for VehicleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VehicleKind::Manual => write!(f, "manual"),
            VehicleKind::Electric => write!(f, "electric"),
        }
    }
}

impl FromStr for VehicleKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "manual" => Ok(VehicleKind::Manual),
            "electric" => Ok(VehicleKind::Electric),
            other => Err(DomainError::ValidationError(format!(
                "unknown vehicle kind: {}",
                other
            ))),
        }
    }
}
