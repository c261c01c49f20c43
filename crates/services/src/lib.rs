#![forbid(unsafe_code)]

pub mod answer_service;
pub mod app_services;
pub mod content_service;
pub mod error;
pub mod progress_service;

pub use quiz_core::Clock;

pub use answer_service::{AnswerService, Graded};
pub use app_services::AppServices;
pub use content_service::{ContentService, SeedReport};
pub use error::{AnswerError, AppServicesError, ContentError, ProgressError};
pub use progress_service::ProgressService;
