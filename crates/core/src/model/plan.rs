use thiserror::Error;

use crate::model::ids::PlanId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PlanError {
    #[error("plan name cannot be empty")]
    EmptyName,

    #[error("daily verse target must be >= 1")]
    InvalidTarget,
}

/// A suggested reading pace, e.g. "whole Bible in a year" at 85 verses/day.
///
/// Plans are curated reference data; readers pick one for guidance, the
/// tracker itself only lists the active ones ordered by daily target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadingPlan {
    id: PlanId,
    name: String,
    description: Option<String>,
    daily_verse_target: u32,
    is_active: bool,
}

impl ReadingPlan {
    /// Creates a plan entry.
    ///
    /// # Errors
    ///
    /// Returns `PlanError::EmptyName` for a blank name and
    /// `PlanError::InvalidTarget` for a zero daily target.
    pub fn new(
        id: PlanId,
        name: impl Into<String>,
        description: Option<String>,
        daily_verse_target: u32,
        is_active: bool,
    ) -> Result<Self, PlanError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(PlanError::EmptyName);
        }
        if daily_verse_target == 0 {
            return Err(PlanError::InvalidTarget);
        }
        Ok(Self {
            id,
            name,
            description,
            daily_verse_target,
            is_active,
        })
    }

    #[must_use]
    pub fn id(&self) -> PlanId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[must_use]
    pub fn daily_verse_target(&self) -> u32 {
        self.daily_verse_target
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.is_active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_a_valid_plan() {
        let plan = ReadingPlan::new(PlanId::new(1), "Un año", None, 85, true).unwrap();
        assert_eq!(plan.daily_verse_target(), 85);
        assert!(plan.is_active());
    }

    #[test]
    fn rejects_zero_target() {
        let err = ReadingPlan::new(PlanId::new(1), "Plan", None, 0, true).unwrap_err();
        assert_eq!(err, PlanError::InvalidTarget);
    }
}
