// CarCare Infrastructure - System Adapters
// Implements: NotificationDispatcher (local timers + file-backed permission)

pub mod delivery;
pub mod notification_center;
pub mod permission;

pub use delivery::DeliverySink;
pub use notification_center::LocalNotificationCenter;
pub use permission::{PermissionStore, PromptAnswer};
