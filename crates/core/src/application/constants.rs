// Application constants (no magic values)
use std::time::Duration;

/// Local hour at which every reminder fires (09:00:00)
pub const REMINDER_HOUR: u32 = 9;

/// Default interval between authorization polls (30s)
pub const DEFAULT_AUTH_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Lower bound for the authorization poll interval (1s)
pub const MIN_AUTH_POLL_INTERVAL: Duration = Duration::from_secs(1);
