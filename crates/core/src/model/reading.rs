use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{UserId, VerseId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ReadingError {
    #[error("a daily reading must count at least one verse")]
    ZeroCount,
}

//
// ─── VERSE READING ─────────────────────────────────────────────────────────────
//

/// A record that a specific reader has read a specific verse at least once.
///
/// The `(user, verse)` pair is unique in storage; re-marking the same verse
/// is a no-op there, so a verse contributes exactly once to the reader's
/// lifetime total no matter how often it is submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerseReading {
    pub user_id: UserId,
    pub verse_id: VerseId,
}

impl VerseReading {
    #[must_use]
    pub fn new(user_id: UserId, verse_id: VerseId) -> Self {
        Self { user_id, verse_id }
    }
}

//
// ─── DAILY READING ─────────────────────────────────────────────────────────────
//

/// A per-reader, per-calendar-day verse count.
///
/// A row exists for a day iff at least one verse was recorded that day, and
/// its count is authoritative for streaks. The count reflects the most
/// recent submission for the day (last write wins), not a running total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyReading {
    user_id: UserId,
    date: NaiveDate,
    verses_read: u32,
    updated_at: DateTime<Utc>,
}

impl DailyReading {
    /// Creates a daily record.
    ///
    /// # Errors
    ///
    /// Returns `ReadingError::ZeroCount` for a zero verse count; a day with
    /// nothing read is represented by the absence of a row, never a zero row.
    pub fn new(
        user_id: UserId,
        date: NaiveDate,
        verses_read: u32,
        updated_at: DateTime<Utc>,
    ) -> Result<Self, ReadingError> {
        if verses_read == 0 {
            return Err(ReadingError::ZeroCount);
        }
        Ok(Self {
            user_id,
            date,
            verses_read,
            updated_at,
        })
    }

    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    #[must_use]
    pub fn verses_read(&self) -> u32 {
        self.verses_read
    }

    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
