// Notification Domain Model
// Identifier format: "{type_tag}-{tier_offset_days}-{epoch_seconds_of_fire_instant}"

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::domain::maintenance_type::MaintenanceType;
use crate::domain::reminder::{NotificationSound, ReminderTier};

/// Category attached to every reminder
pub const MAINTENANCE_REMINDER_CATEGORY: &str = "MAINTENANCE_REMINDER";

/// What the user sees when a reminder fires
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationContent {
    pub title: String,
    pub body: String,
    pub sound: NotificationSound,
    pub badge: bool,
    pub category: String,
}

impl NotificationContent {
    pub fn for_tier(tier: ReminderTier, maintenance_type: MaintenanceType) -> Self {
        Self {
            title: tier.title().to_string(),
            body: tier.body(maintenance_type),
            sound: tier.sound(),
            badge: tier.badge(),
            category: MAINTENANCE_REMINDER_CATEGORY.to_string(),
        }
    }
}

/// One-shot, non-repeating notification handed to the dispatcher
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRequest {
    pub identifier: String,
    pub fire_at: DateTime<FixedOffset>,
    pub content: NotificationContent,
}

impl NotificationRequest {
    pub fn new(
        maintenance_type: MaintenanceType,
        tier: ReminderTier,
        fire_at: DateTime<FixedOffset>,
    ) -> Self {
        Self {
            identifier: notification_identifier(maintenance_type, tier, &fire_at),
            fire_at,
            content: NotificationContent::for_tier(tier, maintenance_type),
        }
    }
}

/// Build the identifier for a (type, tier, fire instant) triple
pub fn notification_identifier(
    maintenance_type: MaintenanceType,
    tier: ReminderTier,
    fire_at: &DateTime<FixedOffset>,
) -> String {
    format!(
        "{}-{}-{}",
        maintenance_type.tag(),
        tier.offset_days(),
        fire_at.timestamp()
    )
}

/// Prefix shared by every identifier owned by a type
pub fn type_prefix(maintenance_type: MaintenanceType) -> String {
    format!("{}-", maintenance_type.tag())
}

/// Whether an identifier belongs to the given type
pub fn is_owned_by(identifier: &str, maintenance_type: MaintenanceType) -> bool {
    identifier.starts_with(&type_prefix(maintenance_type))
}

/// Split an identifier back into its parts.
/// Returns `None` for identifiers this system did not produce.
pub fn parse_identifier(identifier: &str) -> Option<(MaintenanceType, ReminderTier, i64)> {
    let mut parts = identifier.rsplitn(3, '-');
    let epoch = parts.next()?.parse::<i64>().ok()?;
    let offset = parts.next()?.parse::<u32>().ok()?;
    let tag = parts.next()?;

    let maintenance_type = MaintenanceType::from_tag(tag);
    if maintenance_type == MaintenanceType::Unknown {
        return None;
    }
    let tier = ReminderTier::from_offset_days(offset)?;
    Some((maintenance_type, tier, epoch))
}
