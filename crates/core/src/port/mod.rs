// Port Layer - Interfaces for external dependencies

pub mod id_provider; // For deterministic testing
pub mod notification_dispatcher;
pub mod record_store;
pub mod time_provider;

// Re-exports
pub use id_provider::{IdProvider, UuidProvider};
pub use notification_dispatcher::{DispatchError, NotificationDispatcher};
pub use record_store::{LoadError, RecordStore, SaveError};
pub use time_provider::{SystemTimeProvider, TimeProvider};
