#![forbid(unsafe_code)]

pub mod app_services;
pub mod auth_service;
pub mod error;
pub mod library_service;
pub mod plan_service;
pub mod progress_service;
pub mod reading_service;

pub use lectio_core::Clock;

pub use app_services::TrackerServices;
pub use auth_service::{AuthService, Session, SessionToken};
pub use error::{
    AuthError, LibraryError, PlanServiceError, ProgressError, RecordError, SelectionError,
    TrackerServicesError,
};
pub use library_service::{LibraryService, Selection, SelectionDraft};
pub use plan_service::PlanService;
pub use progress_service::{ProgressService, ProgressSummary};
pub use reading_service::{ReadingService, RecordedBatch};
