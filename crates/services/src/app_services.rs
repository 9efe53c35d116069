use std::sync::Arc;

use lectio_core::model::UserId;
use lectio_core::time::Clock;
use storage::repository::{InMemoryRepository, Storage};

use crate::auth_service::AuthService;
use crate::error::TrackerServicesError;
use crate::library_service::{LibraryService, Selection};
use crate::plan_service::PlanService;
use crate::progress_service::{ProgressService, ProgressSummary};
use crate::reading_service::ReadingService;

/// Assembles the tracker's services over one storage backend and one clock.
///
/// This is the composition root: everything a caller needs is reached from
/// here, and every operation takes its reader identity explicitly.
#[derive(Clone)]
pub struct TrackerServices {
    auth: Arc<AuthService>,
    library: Arc<LibraryService>,
    recorder: Arc<ReadingService>,
    progress: Arc<ProgressService>,
    plans: Arc<PlanService>,
}

impl TrackerServices {
    /// Build services backed by `SQLite` storage, running migrations first.
    ///
    /// # Errors
    ///
    /// Returns `TrackerServicesError::Sqlite` if the database cannot be
    /// opened or migrated.
    pub async fn new_sqlite(db_url: &str, clock: Clock) -> Result<Self, TrackerServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::from_storage(&storage, clock))
    }

    /// Build services over in-memory storage; used by tests and prototypes.
    #[must_use]
    pub fn in_memory(clock: Clock) -> Self {
        Self::from_storage(&Storage::in_memory(), clock)
    }

    /// Wire services over an existing storage aggregate.
    #[must_use]
    pub fn from_storage(storage: &Storage, clock: Clock) -> Self {
        let auth = Arc::new(AuthService::new(clock, Arc::clone(&storage.users)));
        let library = Arc::new(LibraryService::new(Arc::clone(&storage.scripture)));
        let recorder = Arc::new(ReadingService::new(clock, Arc::clone(&storage.readings)));
        let progress = Arc::new(ProgressService::new(
            clock,
            Arc::clone(&storage.readings),
            Arc::clone(&storage.scripture),
        ));
        let plans = Arc::new(PlanService::new(Arc::clone(&storage.plans)));

        Self {
            auth,
            library,
            recorder,
            progress,
            plans,
        }
    }

    /// Records a validated selection for the reader and returns the
    /// refreshed progress summary.
    ///
    /// Resolving the selection, marking the verses, and re-aggregating run
    /// as one caller-visible unit; the fresh summary is the view refresh a
    /// successful recording must trigger.
    ///
    /// # Errors
    ///
    /// Returns selection/resolution errors before anything is written, and
    /// recording or aggregation errors afterwards.
    pub async fn record_selection(
        &self,
        user_id: UserId,
        selection: &Selection,
    ) -> Result<ProgressSummary, TrackerServicesError> {
        let verse_ids = self.library.resolve_selection(selection).await?;
        self.recorder.record(user_id, &verse_ids).await?;
        Ok(self.progress.summary(user_id).await?)
    }

    #[must_use]
    pub fn auth(&self) -> Arc<AuthService> {
        Arc::clone(&self.auth)
    }

    #[must_use]
    pub fn library(&self) -> Arc<LibraryService> {
        Arc::clone(&self.library)
    }

    #[must_use]
    pub fn recorder(&self) -> Arc<ReadingService> {
        Arc::clone(&self.recorder)
    }

    #[must_use]
    pub fn progress(&self) -> Arc<ProgressService> {
        Arc::clone(&self.progress)
    }

    #[must_use]
    pub fn plans(&self) -> Arc<PlanService> {
        Arc::clone(&self.plans)
    }

    /// Variant of `from_storage` that keeps a seedable in-memory handle.
    #[must_use]
    pub fn with_in_memory(repo: InMemoryRepository, clock: Clock) -> Self {
        Self::from_storage(&Storage::from_in_memory(repo), clock)
    }
}
