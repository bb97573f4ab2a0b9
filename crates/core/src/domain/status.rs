// Urgency Status Domain Model

use serde::{Deserialize, Serialize};

/// Urgency of a maintenance type. Declaration order is severity order,
/// so `max()` over a set of statuses yields the worst one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UrgencyStatus {
    UpToDate,
    DueSoon,
    Due,
}

impl std::fmt::Display for UrgencyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UrgencyStatus::UpToDate => write!(f, "UP_TO_DATE"),
            UrgencyStatus::DueSoon => write!(f, "DUE_SOON"),
            UrgencyStatus::Due => write!(f, "DUE"),
        }
    }
}
