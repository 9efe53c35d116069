use std::sync::Arc;

use serde::Serialize;
use tracing::warn;

use lectio_core::model::UserId;
use lectio_core::streak::{HISTORY_WINDOW, current_streak};
use lectio_core::time::Clock;
use storage::repository::{ReadingRepository, ScriptureRepository};

use crate::error::ProgressError;

/// Everything the dashboard shows about a reader's progress.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressSummary {
    /// Lifetime count of distinct verses read.
    pub total_read: u64,
    /// Verses recorded today, 0 when nothing was recorded yet.
    pub today_read: u32,
    /// Consecutive reading days ending today or yesterday.
    pub streak: u32,
    /// Share of the whole canon read so far, 0.0–100.0.
    pub percent_complete: f64,
}

/// Aggregates a reader's lifetime total, today's count, and the streak.
pub struct ProgressService {
    clock: Clock,
    readings: Arc<dyn ReadingRepository>,
    scripture: Arc<dyn ScriptureRepository>,
}

impl ProgressService {
    #[must_use]
    pub fn new(
        clock: Clock,
        readings: Arc<dyn ReadingRepository>,
        scripture: Arc<dyn ScriptureRepository>,
    ) -> Self {
        Self {
            clock,
            readings,
            scripture,
        }
    }

    /// Builds the full summary for one reader.
    ///
    /// A missing daily row for today reads as 0, never as an error; any
    /// other storage failure propagates.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::Storage` when the store cannot be read.
    pub async fn summary(&self, user_id: UserId) -> Result<ProgressSummary, ProgressError> {
        let today = self.clock.today();

        let total_read = self.readings.count_verses_read(user_id).await?;

        let today_read = self
            .readings
            .daily_reading(user_id, today)
            .await?
            .map_or(0, |reading| reading.verses_read());

        let history = self
            .readings
            .recent_daily_entries(user_id, HISTORY_WINDOW)
            .await
            .map_err(|err| {
                warn!(user = %user_id, error = %err, "reading history unavailable");
                err
            })?;
        let streak = current_streak(today, &history);

        let total_verses = self.scripture.count_verses().await?;

        Ok(ProgressSummary {
            total_read,
            today_read,
            streak,
            percent_complete: percent_complete(total_read, total_verses),
        })
    }
}

/// Share of `total_verses` covered by `total_read`, clamped to 100.
#[allow(clippy::cast_precision_loss)]
fn percent_complete(total_read: u64, total_verses: u64) -> f64 {
    if total_verses == 0 {
        return 0.0;
    }
    let percent = (total_read as f64 / total_verses as f64) * 100.0;
    percent.min(100.0)
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
