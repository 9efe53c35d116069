use chrono::NaiveDate;
use lectio_core::model::{DailyReading, UserId, VerseId};
use lectio_core::streak::DailyEntry;
use sqlx::Row;

use super::SqliteRepository;
use super::mapping::{id_i64, map_daily_reading_row, ser};
use crate::repository::{ReadingRepository, StorageError};

#[async_trait::async_trait]
impl ReadingRepository for SqliteRepository {
    async fn mark_verses_read(
        &self,
        user_id: UserId,
        verse_ids: &[VerseId],
    ) -> Result<u64, StorageError> {
        if verse_ids.is_empty() {
            return Ok(0);
        }

        let user = user_id.to_string();
        let mut tx = self
            .pool()
            .begin()
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut inserted = 0u64;
        for verse_id in verse_ids {
            let res = sqlx::query(
                r"
                INSERT INTO verse_readings (user_id, verse_id)
                VALUES (?1, ?2)
                ON CONFLICT(user_id, verse_id) DO NOTHING
                ",
            )
            .bind(user.clone())
            .bind(id_i64("verse_id", verse_id.value())?)
            .execute(&mut *tx)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;
            inserted += res.rows_affected();
        }

        tx.commit()
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(inserted)
    }

    async fn count_verses_read(&self, user_id: UserId) -> Result<u64, StorageError> {
        let row = sqlx::query(
            r"
            SELECT COUNT(*) AS n
            FROM verse_readings
            WHERE user_id = ?1
            ",
        )
        .bind(user_id.to_string())
        .fetch_one(self.pool())
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let n: i64 = row.try_get("n").map_err(ser)?;
        u64::try_from(n).map_err(|_| StorageError::Serialization(format!("invalid count: {n}")))
    }

    async fn upsert_daily_reading(&self, reading: &DailyReading) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO daily_readings (user_id, reading_date, verses_read_count, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(user_id, reading_date) DO UPDATE SET
                verses_read_count = excluded.verses_read_count,
                updated_at = excluded.updated_at
            ",
        )
        .bind(reading.user_id().to_string())
        .bind(reading.date())
        .bind(i64::from(reading.verses_read()))
        .bind(reading.updated_at())
        .execute(self.pool())
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(())
    }

    async fn daily_reading(
        &self,
        user_id: UserId,
        date: NaiveDate,
    ) -> Result<Option<DailyReading>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT user_id, reading_date, verses_read_count, updated_at
            FROM daily_readings
            WHERE user_id = ?1 AND reading_date = ?2
            ",
        )
        .bind(user_id.to_string())
        .bind(date)
        .fetch_optional(self.pool())
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        row.map(|row| map_daily_reading_row(&row)).transpose()
    }

    async fn recent_daily_entries(
        &self,
        user_id: UserId,
        limit: u32,
    ) -> Result<Vec<DailyEntry>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT reading_date, verses_read_count
            FROM daily_readings
            WHERE user_id = ?1 AND verses_read_count > 0
            ORDER BY reading_date DESC
            LIMIT ?2
            ",
        )
        .bind(user_id.to_string())
        .bind(i64::from(limit))
        .fetch_all(self.pool())
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut entries = Vec::with_capacity(rows.len());
        for row in rows {
            let date: NaiveDate = row.try_get("reading_date").map_err(ser)?;
            let count_i64: i64 = row.try_get("verses_read_count").map_err(ser)?;
            let count = u32::try_from(count_i64).map_err(|_| {
                StorageError::Serialization(format!("invalid verses_read_count: {count_i64}"))
            })?;
            entries.push(DailyEntry::new(date, count));
        }
        Ok(entries)
    }
}
