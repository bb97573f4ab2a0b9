// Domain Layer - Pure business logic and entities

pub mod authorization;
pub mod error;
pub mod maintenance_type;
pub mod notification;
pub mod record;
pub mod reminder;
pub mod status;
pub mod vehicle;

// Re-exports
pub use authorization::{AuthorizationEffect, AuthorizationEvent, AuthorizationState};
pub use error::DomainError;
pub use maintenance_type::MaintenanceType;
pub use notification::{
    NotificationContent, NotificationRequest, MAINTENANCE_REMINDER_CATEGORY,
};
pub use record::{latest_of_type, MaintenanceRecord, RecordId};
pub use reminder::{tiers_for, NotificationSound, ReminderTier};
pub use status::UrgencyStatus;
pub use vehicle::VehicleKind;
