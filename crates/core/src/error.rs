use thiserror::Error;

use crate::model::{BookError, ChapterError, PlanError, ReadingError, VerseError, VerseRangeError};

/// Umbrella error for core model validation.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Book(#[from] BookError),
    #[error(transparent)]
    Chapter(#[from] ChapterError),
    #[error(transparent)]
    Verse(#[from] VerseError),
    #[error(transparent)]
    VerseRange(#[from] VerseRangeError),
    #[error(transparent)]
    Reading(#[from] ReadingError),
    #[error(transparent)]
    Plan(#[from] PlanError),
}
