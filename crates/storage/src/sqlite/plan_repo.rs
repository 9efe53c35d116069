use lectio_core::model::ReadingPlan;

use super::SqliteRepository;
use super::mapping::{id_i64, map_plan_row};
use crate::repository::{PlanRepository, StorageError};

#[async_trait::async_trait]
impl PlanRepository for SqliteRepository {
    async fn list_active_plans(&self) -> Result<Vec<ReadingPlan>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, name, description, daily_verse_target, is_active
            FROM reading_plans
            WHERE is_active = 1
            ORDER BY daily_verse_target
            ",
        )
        .fetch_all(self.pool())
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut plans = Vec::with_capacity(rows.len());
        for row in rows {
            plans.push(map_plan_row(&row)?);
        }
        Ok(plans)
    }
}

impl SqliteRepository {
    /// Inserts a reading plan; curated data, loaded by the `seed` binary.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` when the write fails.
    pub async fn insert_plan(&self, plan: &ReadingPlan) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO reading_plans (id, name, description, daily_verse_target, is_active)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                description = excluded.description,
                daily_verse_target = excluded.daily_verse_target,
                is_active = excluded.is_active
            ",
        )
        .bind(id_i64("plan_id", plan.id().value())?)
        .bind(plan.name().to_owned())
        .bind(plan.description().map(ToOwned::to_owned))
        .bind(i64::from(plan.daily_verse_target()))
        .bind(i64::from(plan.is_active()))
        .execute(self.pool())
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(())
    }
}
