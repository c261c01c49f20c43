use async_trait::async_trait;
use quiz_core::model::{
    EnglishExercise, EnglishFilter, ExerciseId, MathFilter, MathProblem, ProblemId, SessionId,
    SessionProgress,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Content store for math problems.
#[async_trait]
pub trait MathProblemRepository: Send + Sync {
    /// Pick one problem uniformly at random among those matching `filter`.
    ///
    /// Returns `Ok(None)` when nothing matches.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn sample_problem(&self, filter: MathFilter) -> Result<Option<MathProblem>, StorageError>;

    /// Fetch a problem by ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn get_problem(&self, id: ProblemId) -> Result<Option<MathProblem>, StorageError>;

    /// Append problems to the collection.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` if an ID already exists.
    async fn insert_problems(&self, problems: &[MathProblem]) -> Result<(), StorageError>;

    /// Number of stored problems.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn count_problems(&self) -> Result<u64, StorageError>;
}

/// Content store for English exercises.
#[async_trait]
pub trait EnglishExerciseRepository: Send + Sync {
    /// Pick one exercise uniformly at random among those matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn sample_exercise(
        &self,
        filter: EnglishFilter,
    ) -> Result<Option<EnglishExercise>, StorageError>;

    /// Fetch an exercise by ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn get_exercise(&self, id: ExerciseId) -> Result<Option<EnglishExercise>, StorageError>;

    /// Append exercises to the collection.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` if an ID already exists.
    async fn insert_exercises(&self, exercises: &[EnglishExercise]) -> Result<(), StorageError>;

    /// Number of stored exercises.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn count_exercises(&self) -> Result<u64, StorageError>;
}

/// Per-session progress, one record per session key.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Fetch progress for a session.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn get_progress(
        &self,
        session_id: &SessionId,
    ) -> Result<Option<SessionProgress>, StorageError>;

    /// Insert or replace the record keyed by its session ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be stored.
    async fn upsert_progress(&self, progress: &SessionProgress) -> Result<(), StorageError>;
}

//
// ─── IN-MEMORY ─────────────────────────────────────────────────────────────────
//

/// In-memory repository for tests and storage-free runs.
///
/// Each collection sits behind its own mutex. Sampling draws from a shared
/// `StdRng` that can be seeded for reproducible picks.
#[derive(Clone)]
pub struct InMemoryRepository {
    problems: Arc<Mutex<Vec<MathProblem>>>,
    exercises: Arc<Mutex<Vec<EnglishExercise>>>,
    progress: Arc<Mutex<HashMap<SessionId, SessionProgress>>>,
    rng: Arc<Mutex<StdRng>>,
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    /// Repository whose sampling order is reproducible.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            problems: Arc::new(Mutex::new(Vec::new())),
            exercises: Arc::new(Mutex::new(Vec::new())),
            progress: Arc::new(Mutex::new(HashMap::new())),
            rng: Arc::new(Mutex::new(rng)),
        }
    }

    fn choose<T: Clone>(&self, candidates: &[&T]) -> Result<Option<T>, StorageError> {
        let mut rng = lock(&self.rng)?;
        Ok(candidates.choose(&mut *rng).map(|item| (*item).clone()))
    }
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, StorageError> {
    mutex
        .lock()
        .map_err(|e| StorageError::Connection(e.to_string()))
}

fn u64_len(len: usize) -> Result<u64, StorageError> {
    u64::try_from(len).map_err(|_| StorageError::Serialization("count overflow".into()))
}

#[async_trait]
impl MathProblemRepository for InMemoryRepository {
    async fn sample_problem(&self, filter: MathFilter) -> Result<Option<MathProblem>, StorageError> {
        let guard = lock(&self.problems)?;
        let matching: Vec<&MathProblem> = guard.iter().filter(|p| filter.matches(p)).collect();
        self.choose(&matching)
    }

    async fn get_problem(&self, id: ProblemId) -> Result<Option<MathProblem>, StorageError> {
        let guard = lock(&self.problems)?;
        Ok(guard.iter().find(|p| p.id == id).cloned())
    }

    async fn insert_problems(&self, problems: &[MathProblem]) -> Result<(), StorageError> {
        let mut guard = lock(&self.problems)?;
        if problems
            .iter()
            .any(|new| guard.iter().any(|existing| existing.id == new.id))
        {
            return Err(StorageError::Conflict);
        }
        guard.extend_from_slice(problems);
        Ok(())
    }

    async fn count_problems(&self) -> Result<u64, StorageError> {
        u64_len(lock(&self.problems)?.len())
    }
}

#[async_trait]
impl EnglishExerciseRepository for InMemoryRepository {
    async fn sample_exercise(
        &self,
        filter: EnglishFilter,
    ) -> Result<Option<EnglishExercise>, StorageError> {
        let guard = lock(&self.exercises)?;
        let matching: Vec<&EnglishExercise> = guard.iter().filter(|e| filter.matches(e)).collect();
        self.choose(&matching)
    }

    async fn get_exercise(&self, id: ExerciseId) -> Result<Option<EnglishExercise>, StorageError> {
        let guard = lock(&self.exercises)?;
        Ok(guard.iter().find(|e| e.id == id).cloned())
    }

    async fn insert_exercises(&self, exercises: &[EnglishExercise]) -> Result<(), StorageError> {
        let mut guard = lock(&self.exercises)?;
        if exercises
            .iter()
            .any(|new| guard.iter().any(|existing| existing.id == new.id))
        {
            return Err(StorageError::Conflict);
        }
        guard.extend_from_slice(exercises);
        Ok(())
    }

    async fn count_exercises(&self) -> Result<u64, StorageError> {
        u64_len(lock(&self.exercises)?.len())
    }
}

#[async_trait]
impl ProgressRepository for InMemoryRepository {
    async fn get_progress(
        &self,
        session_id: &SessionId,
    ) -> Result<Option<SessionProgress>, StorageError> {
        let guard = lock(&self.progress)?;
        Ok(guard.get(session_id).cloned())
    }

    async fn upsert_progress(&self, progress: &SessionProgress) -> Result<(), StorageError> {
        let mut guard = lock(&self.progress)?;
        guard.insert(progress.session_id().clone(), progress.clone());
        Ok(())
    }
}

/// Aggregates the repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub problems: Arc<dyn MathProblemRepository>,
    pub exercises: Arc<dyn EnglishExerciseRepository>,
    pub progress: Arc<dyn ProgressRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_in_memory(InMemoryRepository::new())
    }

    #[must_use]
    pub fn from_in_memory(repo: InMemoryRepository) -> Self {
        let problems: Arc<dyn MathProblemRepository> = Arc::new(repo.clone());
        let exercises: Arc<dyn EnglishExerciseRepository> = Arc::new(repo.clone());
        let progress: Arc<dyn ProgressRepository> = Arc::new(repo);
        Self {
            problems,
            exercises,
            progress,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::generator;
    use quiz_core::model::{Difficulty, EnglishKind, MathKind, Subject};
    use quiz_core::time::fixed_now;

    fn seeded_repo() -> InMemoryRepository {
        InMemoryRepository::with_seed(11)
    }

    fn catalog() -> Vec<MathProblem> {
        generator::math_problems(&mut StdRng::seed_from_u64(3), fixed_now())
    }

    #[tokio::test]
    async fn sample_on_empty_collection_is_none() {
        let repo = seeded_repo();
        assert!(repo.sample_problem(MathFilter::default()).await.unwrap().is_none());
        assert!(repo.sample_exercise(EnglishFilter::default()).await.unwrap().is_none());
        assert_eq!(repo.count_problems().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn sample_respects_every_filter_field() {
        let repo = seeded_repo();
        repo.insert_problems(&catalog()).await.unwrap();

        let filter = MathFilter::new(Some(MathKind::Subtraction), Some(Difficulty::Medium));
        for _ in 0..50 {
            let p = repo.sample_problem(filter).await.unwrap().unwrap();
            assert_eq!(p.kind, MathKind::Subtraction);
            assert_eq!(p.difficulty, Difficulty::Medium);
        }
    }

    #[tokio::test]
    async fn sample_eventually_visits_every_match() {
        let repo = seeded_repo();
        repo.insert_exercises(&generator::english_exercises(fixed_now()))
            .await
            .unwrap();

        let filter = EnglishFilter::new(Some(EnglishKind::Grammar), None);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..400 {
            seen.insert(repo.sample_exercise(filter).await.unwrap().unwrap().id);
        }
        assert_eq!(seen.len(), 8);
    }

    #[tokio::test]
    async fn get_finds_inserted_items_only() {
        let repo = seeded_repo();
        let problems = catalog();
        repo.insert_problems(&problems).await.unwrap();

        let fetched = repo.get_problem(problems[5].id).await.unwrap().unwrap();
        assert_eq!(fetched, problems[5]);
        assert!(repo.get_problem(ProblemId::generate()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_ids_conflict() {
        let repo = seeded_repo();
        let problems = catalog();
        repo.insert_problems(&problems).await.unwrap();
        let err = repo.insert_problems(&problems[..1]).await.unwrap_err();
        assert!(matches!(err, StorageError::Conflict));
        assert_eq!(repo.count_problems().await.unwrap(), 64);
    }

    #[tokio::test]
    async fn upsert_replaces_progress_for_same_session() {
        let repo = seeded_repo();
        let session = SessionId::new("abc");
        let mut progress = SessionProgress::new(session.clone(), fixed_now());
        repo.upsert_progress(&progress).await.unwrap();

        progress.record(Subject::Math, true, fixed_now());
        repo.upsert_progress(&progress).await.unwrap();

        let stored = repo.get_progress(&session).await.unwrap().unwrap();
        assert_eq!(stored.math_score(), 1);
        assert_eq!(stored.id(), progress.id());
        assert!(repo.get_progress(&SessionId::new("other")).await.unwrap().is_none());
    }
}
