use std::sync::Arc;

use storage::repository::Storage;

use crate::Clock;
use crate::answer_service::AnswerService;
use crate::content_service::ContentService;
use crate::error::AppServicesError;
use crate::progress_service::ProgressService;

/// Assembles the app-facing services over one storage backend.
#[derive(Clone)]
pub struct AppServices {
    content: Arc<ContentService>,
    progress: Arc<ProgressService>,
    answers: Arc<AnswerService>,
}

impl AppServices {
    /// Wire services over an already-built storage aggregate.
    ///
    /// `rng_seed` makes generated operand values reproducible.
    #[must_use]
    pub fn new(storage: &Storage, clock: Clock, rng_seed: Option<u64>) -> Self {
        let content = ContentService::new(
            clock,
            Arc::clone(&storage.problems),
            Arc::clone(&storage.exercises),
        );
        let content = Arc::new(match rng_seed {
            Some(seed) => content.with_rng_seed(seed),
            None => content,
        });
        let progress = Arc::new(ProgressService::new(clock, Arc::clone(&storage.progress)));
        let answers = Arc::new(AnswerService::new(
            Arc::clone(&content),
            Arc::clone(&progress),
        ));

        Self {
            content,
            progress,
            answers,
        }
    }

    /// Services over a fresh in-memory store.
    #[must_use]
    pub fn in_memory(clock: Clock, rng_seed: Option<u64>) -> Self {
        Self::new(&Storage::in_memory(), clock, rng_seed)
    }

    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError::Sqlite` if connecting or migrating fails.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        rng_seed: Option<u64>,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::new(&storage, clock, rng_seed))
    }

    #[must_use]
    pub fn content(&self) -> Arc<ContentService> {
        Arc::clone(&self.content)
    }

    #[must_use]
    pub fn progress(&self) -> Arc<ProgressService> {
        Arc::clone(&self.progress)
    }

    #[must_use]
    pub fn answers(&self) -> Arc<AnswerService> {
        Arc::clone(&self.answers)
    }
}
