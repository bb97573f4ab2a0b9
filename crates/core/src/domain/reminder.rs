//! Reminder tiers and the frequency → tier lookup table.
//!
//! Five tiers exist system-wide. Which of them apply to a maintenance type
//! depends only on the type's catalog (base) frequency:
//!
//! | base frequency | tiers            |
//! |----------------|------------------|
//! | ≤ 7 days       | 2-day            |
//! | 8–14 days      | 3-day            |
//! | 15–30 days     | 7-day, 3-day     |
//! | > 30 days      | 30-day, 7-day    |

use serde::{Deserialize, Serialize};

use crate::domain::maintenance_type::MaintenanceType;

/// Reminder emitted a fixed number of days before the due date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderTier {
    MonthBefore,
    TwoWeeksBefore,
    FinalWeek,
    ThreeDays,
    TwoDays,
}

/// Notification sound level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationSound {
    Standard,
    Critical,
}

impl ReminderTier {
    pub const ALL: [ReminderTier; 5] = [
        ReminderTier::MonthBefore,
        ReminderTier::TwoWeeksBefore,
        ReminderTier::FinalWeek,
        ReminderTier::ThreeDays,
        ReminderTier::TwoDays,
    ];

    pub const fn offset_days(self) -> u32 {
        match self {
            ReminderTier::MonthBefore => 30,
            ReminderTier::TwoWeeksBefore => 14,
            ReminderTier::FinalWeek => 7,
            ReminderTier::ThreeDays => 3,
            ReminderTier::TwoDays => 2,
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            ReminderTier::MonthBefore => "📌 Upcoming maintenance",
            ReminderTier::TwoWeeksBefore => "📋 Maintenance in 2 weeks",
            ReminderTier::FinalWeek => "📅 Maintenance in 1 week",
            ReminderTier::ThreeDays => "🔔 Maintenance reminder",
            ReminderTier::TwoDays => "⚠️ Maintenance imminent",
        }
    }

    pub fn body(self, maintenance_type: MaintenanceType) -> String {
        let name = maintenance_type.display_name();
        match self {
            ReminderTier::MonthBefore => format!("{} in {} days", name, self.offset_days()),
            ReminderTier::TwoWeeksBefore => name.to_string(),
            ReminderTier::FinalWeek => format!("{} due in 7 days", name),
            ReminderTier::ThreeDays => format!("In 3 days: {}", name),
            ReminderTier::TwoDays => format!("In 2 days: {}", name),
        }
    }

    /// Elevated priority only for the last warning
    pub const fn sound(self) -> NotificationSound {
        match self {
            ReminderTier::TwoDays => NotificationSound::Critical,
            _ => NotificationSound::Standard,
        }
    }

    /// Badge is set only for the one-week warning
    pub const fn badge(self) -> bool {
        matches!(self, ReminderTier::FinalWeek)
    }

    /// Reverse lookup from an offset found in a notification identifier
    pub fn from_offset_days(days: u32) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.offset_days() == days)
    }
}

/// Tiers that apply to a type with the given **base** frequency
pub fn tiers_for(base_frequency_days: u32) -> &'static [ReminderTier] {
    match base_frequency_days {
        0..=7 => &[ReminderTier::TwoDays],
        8..=14 => &[ReminderTier::ThreeDays],
        15..=30 => &[ReminderTier::FinalWeek, ReminderTier::ThreeDays],
        31..=90 => &[ReminderTier::MonthBefore, ReminderTier::FinalWeek],
        _ => &[ReminderTier::MonthBefore, ReminderTier::FinalWeek],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_table_breakpoints() {
        assert_eq!(tiers_for(7), &[ReminderTier::TwoDays]);
        assert_eq!(tiers_for(8), &[ReminderTier::ThreeDays]);
        assert_eq!(tiers_for(14), &[ReminderTier::ThreeDays]);
        assert_eq!(tiers_for(15), &[ReminderTier::FinalWeek, ReminderTier::ThreeDays]);
        assert_eq!(tiers_for(30), &[ReminderTier::FinalWeek, ReminderTier::ThreeDays]);
        assert_eq!(tiers_for(31), &[ReminderTier::MonthBefore, ReminderTier::FinalWeek]);
        assert_eq!(tiers_for(90), &[ReminderTier::MonthBefore, ReminderTier::FinalWeek]);
        assert_eq!(tiers_for(365), &[ReminderTier::MonthBefore, ReminderTier::FinalWeek]);
    }

    #[test]
    fn test_no_tier_below_two_days() {
        for f in 1..=400 {
            for tier in tiers_for(f) {
                assert!(tier.offset_days() >= 2);
            }
        }
    }

    #[test]
    fn test_content_flags() {
        assert_eq!(ReminderTier::TwoDays.sound(), NotificationSound::Critical);
        assert_eq!(ReminderTier::FinalWeek.sound(), NotificationSound::Standard);
        assert!(ReminderTier::FinalWeek.badge());
        assert!(!ReminderTier::MonthBefore.badge());
        assert!(!ReminderTier::TwoDays.badge());
    }

    #[test]
    fn test_month_body_mentions_day_count() {
        let body = ReminderTier::MonthBefore.body(MaintenanceType::ReplaceChain);
        assert_eq!(body, "Replace chain in 30 days");
    }

    #[test]
    fn test_offset_reverse_lookup() {
        assert_eq!(ReminderTier::from_offset_days(7), Some(ReminderTier::FinalWeek));
        assert_eq!(ReminderTier::from_offset_days(1), None);
    }
}
