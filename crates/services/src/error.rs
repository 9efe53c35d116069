//! Shared error types for the services crate.

use thiserror::Error;

use lectio_core::model::{ReadingError, VerseRangeError};
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by `AuthService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AuthError {
    /// Deliberately covers both unknown email and wrong password so a caller
    /// cannot probe which one failed.
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("email is already registered")]
    EmailTaken,

    #[error("email address is not valid")]
    InvalidEmail,

    #[error("password must be at least {min} characters")]
    PasswordTooShort { min: usize },

    #[error("password hashing failed: {0}")]
    Hash(String),

    #[error("session store unavailable: {0}")]
    SessionStore(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while turning a reader's selection into verse ids.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SelectionError {
    #[error("no book selected")]
    NoBook,

    #[error("no chapter selected")]
    NoChapter,

    #[error(transparent)]
    Range(#[from] VerseRangeError),
}

/// Errors emitted by `LibraryService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LibraryError {
    #[error("book {book} has no chapter {chapter_number}")]
    UnknownChapter { book: u64, chapter_number: u32 },

    #[error("range ends at verse {to} but the chapter has {verse_count} verses")]
    RangeOutOfBounds { to: u32, verse_count: u32 },

    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `ReadingService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RecordError {
    #[error("nothing to record: the verse batch is empty")]
    EmptyBatch,

    #[error("verse batch exceeds the daily count range")]
    BatchTooLarge,

    #[error(transparent)]
    Reading(#[from] ReadingError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `ProgressService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `PlanService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PlanServiceError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping or driving the assembled tracker.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TrackerServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Library(#[from] LibraryError),
    #[error(transparent)]
    Record(#[from] RecordError),
    #[error(transparent)]
    Progress(#[from] ProgressError),
}
