use std::sync::Arc;

use lectio_core::model::ReadingPlan;
use storage::repository::PlanRepository;

use crate::error::PlanServiceError;

/// Lists the curated reading plans a reader can pace themselves against.
pub struct PlanService {
    plans: Arc<dyn PlanRepository>,
}

impl PlanService {
    #[must_use]
    pub fn new(plans: Arc<dyn PlanRepository>) -> Self {
        Self { plans }
    }

    /// Active plans, gentlest daily target first.
    ///
    /// # Errors
    ///
    /// Returns `PlanServiceError::Storage` when the store cannot be read.
    pub async fn active_plans(&self) -> Result<Vec<ReadingPlan>, PlanServiceError> {
        Ok(self.plans.list_active_plans().await?)
    }
}
