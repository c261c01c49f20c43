use std::sync::{Arc, Mutex, PoisonError};

use quiz_core::generator;
use quiz_core::model::{
    EnglishExercise, EnglishFilter, ExerciseId, MathFilter, MathProblem, ProblemId,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use storage::repository::{EnglishExerciseRepository, MathProblemRepository};
use tracing::{debug, info};

use crate::Clock;
use crate::error::ContentError;

/// Items inserted by one seeding pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub math_inserted: usize,
    pub english_inserted: usize,
}

/// Serves random content and seeds empty collections on demand.
///
/// Seeding of each collection is serialized by its own async lock, so
/// concurrent first requests generate the catalog once.
pub struct ContentService {
    clock: Clock,
    problems: Arc<dyn MathProblemRepository>,
    exercises: Arc<dyn EnglishExerciseRepository>,
    rng: Mutex<StdRng>,
    math_seed_lock: tokio::sync::Mutex<()>,
    english_seed_lock: tokio::sync::Mutex<()>,
}

impl ContentService {
    #[must_use]
    pub fn new(
        clock: Clock,
        problems: Arc<dyn MathProblemRepository>,
        exercises: Arc<dyn EnglishExerciseRepository>,
    ) -> Self {
        Self {
            clock,
            problems,
            exercises,
            rng: Mutex::new(StdRng::from_os_rng()),
            math_seed_lock: tokio::sync::Mutex::new(()),
            english_seed_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// Make generated operand values reproducible.
    #[must_use]
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    /// Populate any empty collection. Collections that already hold items are
    /// left untouched.
    ///
    /// Each collection is seeded on its own; a failure in one does not stop
    /// the other.
    ///
    /// # Errors
    ///
    /// Returns the first `ContentError::Storage` raised while counting or
    /// inserting.
    pub async fn seed(&self) -> Result<SeedReport, ContentError> {
        let math = self.seed_math().await;
        let english = self.seed_english().await;
        Ok(SeedReport {
            math_inserted: math?,
            english_inserted: english?,
        })
    }

    async fn seed_math(&self) -> Result<usize, ContentError> {
        let _guard = self.math_seed_lock.lock().await;
        if self.problems.count_problems().await? > 0 {
            return Ok(0);
        }

        let problems = {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            generator::math_problems(&mut *rng, self.clock.now())
        };
        self.problems.insert_problems(&problems).await?;
        info!(count = problems.len(), "inserted math problems");
        Ok(problems.len())
    }

    async fn seed_english(&self) -> Result<usize, ContentError> {
        let _guard = self.english_seed_lock.lock().await;
        if self.exercises.count_exercises().await? > 0 {
            return Ok(0);
        }

        let exercises = generator::english_exercises(self.clock.now());
        self.exercises.insert_exercises(&exercises).await?;
        info!(count = exercises.len(), "inserted english exercises");
        Ok(exercises.len())
    }

    /// Random problem matching `filter`, seeding and retrying once if none match.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::NoContent` if nothing matches after seeding.
    /// Returns `ContentError::Storage` if repository access fails.
    pub async fn random_math_problem(
        &self,
        filter: MathFilter,
    ) -> Result<MathProblem, ContentError> {
        if let Some(problem) = self.problems.sample_problem(filter).await? {
            return Ok(problem);
        }

        debug!(?filter, "no math problem matched; seeding and retrying");
        self.seed_math().await?;
        self.problems
            .sample_problem(filter)
            .await?
            .ok_or(ContentError::NoContent)
    }

    /// Random exercise matching `filter`, seeding and retrying once if none match.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::NoContent` if nothing matches after seeding.
    /// Returns `ContentError::Storage` if repository access fails.
    pub async fn random_english_exercise(
        &self,
        filter: EnglishFilter,
    ) -> Result<EnglishExercise, ContentError> {
        if let Some(exercise) = self.exercises.sample_exercise(filter).await? {
            return Ok(exercise);
        }

        debug!(?filter, "no english exercise matched; seeding and retrying");
        self.seed_english().await?;
        self.exercises
            .sample_exercise(filter)
            .await?
            .ok_or(ContentError::NoContent)
    }

    /// Fetch a problem by ID.
    ///
    /// Returns `Ok(None)` when the problem does not exist.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::Storage` if repository access fails.
    pub async fn math_problem(&self, id: ProblemId) -> Result<Option<MathProblem>, ContentError> {
        Ok(self.problems.get_problem(id).await?)
    }

    /// Fetch an exercise by ID.
    ///
    /// Returns `Ok(None)` when the exercise does not exist.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::Storage` if repository access fails.
    pub async fn english_exercise(
        &self,
        id: ExerciseId,
    ) -> Result<Option<EnglishExercise>, ContentError> {
        Ok(self.exercises.get_exercise(id).await?)
    }
}
