use std::sync::Arc;

use tracing::{info, warn};

use lectio_core::model::{DailyReading, UserId, VerseId};
use lectio_core::time::Clock;
use storage::repository::ReadingRepository;

use crate::error::RecordError;

/// Outcome of one recorded batch.
#[derive(Debug, Clone)]
pub struct RecordedBatch {
    /// Verses that were not already marked; duplicates across calls are
    /// skipped by the store and never double-count.
    pub newly_marked: u64,
    /// The day's record as written, with `verses_read` equal to this batch's
    /// size.
    pub daily: DailyReading,
}

/// The reading recorder: marks a verse batch as read, then writes today's
/// count.
///
/// The daily count is an overwrite of the day's row, not an increment, so a
/// second same-day batch replaces the first one's count. The two writes are
/// separate store operations with no cross-operation rollback.
pub struct ReadingService {
    clock: Clock,
    readings: Arc<dyn ReadingRepository>,
}

impl ReadingService {
    #[must_use]
    pub fn new(clock: Clock, readings: Arc<dyn ReadingRepository>) -> Self {
        Self { clock, readings }
    }

    /// Records a batch of verses as read today.
    ///
    /// # Errors
    ///
    /// Returns `RecordError::EmptyBatch` before touching the store when no
    /// verses were selected, and storage errors from either write.
    pub async fn record(
        &self,
        user_id: UserId,
        verse_ids: &[VerseId],
    ) -> Result<RecordedBatch, RecordError> {
        if verse_ids.is_empty() {
            return Err(RecordError::EmptyBatch);
        }
        let batch_size =
            u32::try_from(verse_ids.len()).map_err(|_| RecordError::BatchTooLarge)?;

        let newly_marked = match self.readings.mark_verses_read(user_id, verse_ids).await {
            Ok(count) => count,
            Err(err) => {
                warn!(user = %user_id, error = %err, "marking verses failed");
                return Err(err.into());
            }
        };

        let daily = DailyReading::new(user_id, self.clock.today(), batch_size, self.clock.now())?;
        if let Err(err) = self.readings.upsert_daily_reading(&daily).await {
            warn!(user = %user_id, error = %err, "daily count update failed");
            return Err(err.into());
        }

        info!(
            user = %user_id,
            batch = batch_size,
            newly_marked,
            "recorded reading"
        );
        Ok(RecordedBatch {
            newly_marked,
            daily,
        })
    }
}
