use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Reading history older than a year is never examined.
pub const HISTORY_WINDOW: u32 = 365;

/// One day of reading history: a calendar date with a positive verse count.
///
/// This is the streak calculator's input shape; repositories produce it
/// already filtered to positive counts and ordered most-recent-date-first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyEntry {
    pub date: NaiveDate,
    pub verses_read: u32,
}

impl DailyEntry {
    #[must_use]
    pub fn new(date: NaiveDate, verses_read: u32) -> Self {
        Self { date, verses_read }
    }
}

/// Number of consecutive calendar days, ending today or yesterday, with at
/// least one verse read.
///
/// `history` must be ordered most-recent-date-first and contain only days
/// with a positive count; entries beyond [`HISTORY_WINDOW`] are ignored. The
/// anchor day is `today` when the first entry is dated today, otherwise
/// yesterday — so a reader who has not yet read today keeps yesterday's
/// streak alive. The walk expects entry `i` to be dated exactly `anchor - i`
/// days and stops at the first gap.
///
/// Pure and deterministic: the current date is supplied, never read from the
/// system clock.
#[must_use]
pub fn current_streak(today: NaiveDate, history: &[DailyEntry]) -> u32 {
    let Some(first) = history.first() else {
        return 0;
    };

    let anchor = if first.date == today {
        today
    } else {
        today - Duration::days(1)
    };

    let mut streak = 0u32;
    for (i, entry) in history.iter().take(HISTORY_WINDOW as usize).enumerate() {
        let expected = anchor - Duration::days(i as i64);
        if entry.date != expected {
            break;
        }
        streak += 1;
    }
    streak
}
