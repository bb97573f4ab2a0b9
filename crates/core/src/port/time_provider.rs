// Time Provider Port (for testability)

use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, TimeZone};

/// Time provider interface (allows mocking in tests)
pub trait TimeProvider: Send + Sync {
    /// Current instant in the local time zone
    fn now(&self) -> DateTime<FixedOffset>;

    /// Local calendar date
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }

    /// Resolve a local wall-clock time to an instant.
    /// `None` when the wall time does not exist (DST gap).
    fn at_local(&self, local: NaiveDateTime) -> Option<DateTime<FixedOffset>> {
        self.now().offset().from_local_datetime(&local).single()
    }
}

/// System time provider (production)
pub struct SystemTimeProvider;

impl TimeProvider for SystemTimeProvider {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }

    fn at_local(&self, local: NaiveDateTime) -> Option<DateTime<FixedOffset>> {
        // Offset of the target date, not of today
        Local
            .from_local_datetime(&local)
            .earliest()
            .map(|dt| dt.fixed_offset())
    }
}

pub mod mocks {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Clock frozen at a settable instant, single fixed offset
    #[derive(Clone)]
    pub struct FixedTimeProvider {
        now: Arc<Mutex<DateTime<FixedOffset>>>,
    }

    impl FixedTimeProvider {
        pub fn new(now: DateTime<FixedOffset>) -> Self {
            Self {
                now: Arc::new(Mutex::new(now)),
            }
        }

        /// UTC clock at the given local date and time
        pub fn at(date: NaiveDate, hour: u32, minute: u32) -> Self {
            let offset = FixedOffset::east_opt(0).unwrap();
            let naive = date.and_hms_opt(hour, minute, 0).unwrap();
            Self::new(offset.from_local_datetime(&naive).unwrap())
        }

        pub fn set(&self, now: DateTime<FixedOffset>) {
            *self.now.lock().unwrap() = now;
        }

        pub fn advance(&self, duration: chrono::Duration) {
            let mut now = self.now.lock().unwrap();
            *now += duration;
        }
    }

    impl TimeProvider for FixedTimeProvider {
        fn now(&self) -> DateTime<FixedOffset> {
            *self.now.lock().unwrap()
        }
    }
}
