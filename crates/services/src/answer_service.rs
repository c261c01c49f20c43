use std::sync::Arc;

use quiz_core::grading;
use quiz_core::model::{
    EnglishExercise, EnglishFilter, ExerciseId, MathFilter, MathProblem, ProblemId, SessionId,
    Subject,
};
use tracing::warn;

use crate::content_service::ContentService;
use crate::error::AnswerError;
use crate::progress_service::ProgressService;

/// Outcome of grading one submission, plus the item to show next.
#[derive(Debug, Clone, PartialEq)]
pub struct Graded<T> {
    pub correct: bool,
    pub feedback: String,
    pub next: Option<T>,
}

/// Grades submissions, records them against the session, and picks a follow-up item.
#[derive(Clone)]
pub struct AnswerService {
    content: Arc<ContentService>,
    progress: Arc<ProgressService>,
}

impl AnswerService {
    #[must_use]
    pub fn new(content: Arc<ContentService>, progress: Arc<ProgressService>) -> Self {
        Self { content, progress }
    }

    /// Grade an integer answer to a math problem.
    ///
    /// The next problem has the same type and difficulty.
    ///
    /// # Errors
    ///
    /// Returns `AnswerError::ProblemNotFound` if the problem does not exist.
    /// Returns `AnswerError::Content` if the lookup itself fails.
    pub async fn submit_math(
        &self,
        problem_id: ProblemId,
        answer: i64,
        session_id: &SessionId,
    ) -> Result<Graded<MathProblem>, AnswerError> {
        let problem = self
            .content
            .math_problem(problem_id)
            .await?
            .ok_or(AnswerError::ProblemNotFound(problem_id))?;

        let correct = grading::is_math_correct(&problem, answer);
        self.record(session_id, Subject::Math, correct).await;
        let feedback = grading::math_feedback(&problem, correct);

        let next = match self
            .content
            .random_math_problem(MathFilter::like(&problem))
            .await
        {
            Ok(next) => Some(next),
            Err(error) => {
                warn!(%error, %problem_id, "could not pick next math problem");
                None
            }
        };

        Ok(Graded {
            correct,
            feedback,
            next,
        })
    }

    /// Grade a free-text answer to an English exercise.
    ///
    /// The next exercise has the same type, any difficulty.
    ///
    /// # Errors
    ///
    /// Returns `AnswerError::ExerciseNotFound` if the exercise does not exist.
    /// Returns `AnswerError::Content` if the lookup itself fails.
    pub async fn submit_english(
        &self,
        exercise_id: ExerciseId,
        answer: &str,
        session_id: &SessionId,
    ) -> Result<Graded<EnglishExercise>, AnswerError> {
        let exercise = self
            .content
            .english_exercise(exercise_id)
            .await?
            .ok_or(AnswerError::ExerciseNotFound(exercise_id))?;

        let correct = grading::is_english_correct(&exercise, answer);
        self.record(session_id, Subject::English, correct).await;
        let feedback = grading::english_feedback(&exercise, correct);

        let next = match self
            .content
            .random_english_exercise(EnglishFilter::like(&exercise))
            .await
        {
            Ok(next) => Some(next),
            Err(error) => {
                warn!(%error, %exercise_id, "could not pick next english exercise");
                None
            }
        };

        Ok(Graded {
            correct,
            feedback,
            next,
        })
    }

    // A failed progress write is logged and dropped; the learner still gets feedback.
    async fn record(&self, session_id: &SessionId, subject: Subject, correct: bool) {
        if let Err(error) = self.progress.record_answer(session_id, subject, correct).await {
            warn!(%error, %session_id, %subject, "dropped progress update");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;
    use quiz_core::model::{Difficulty, MathKind, SessionProgress};
    use quiz_core::time::fixed_clock;
    use storage::repository::{InMemoryRepository, ProgressRepository, StorageError};

    struct BrokenProgress;

    #[async_trait]
    impl ProgressRepository for BrokenProgress {
        async fn get_progress(
            &self,
            _session_id: &SessionId,
        ) -> Result<Option<SessionProgress>, StorageError> {
            Err(StorageError::Connection("down".into()))
        }

        async fn upsert_progress(&self, _progress: &SessionProgress) -> Result<(), StorageError> {
            Err(StorageError::Connection("down".into()))
        }
    }

    fn build(repo: &InMemoryRepository, progress: Arc<dyn ProgressRepository>) -> AnswerService {
        let content = Arc::new(
            ContentService::new(fixed_clock(), Arc::new(repo.clone()), Arc::new(repo.clone()))
                .with_rng_seed(9),
        );
        let progress = Arc::new(ProgressService::new(fixed_clock(), progress));
        AnswerService::new(content, progress)
    }

    #[tokio::test]
    async fn progress_failure_does_not_fail_grading() {
        let repo = InMemoryRepository::with_seed(1);
        let service = build(&repo, Arc::new(BrokenProgress));
        let problem = service
            .content
            .random_math_problem(MathFilter::new(Some(MathKind::Addition), Some(Difficulty::Easy)))
            .await
            .unwrap();

        let graded = service
            .submit_math(problem.id, problem.answer, &SessionId::new("s"))
            .await
            .unwrap();
        assert!(graded.correct);
        assert!(graded.next.is_some());
    }

    #[tokio::test]
    async fn unknown_problem_is_not_found() {
        let repo = InMemoryRepository::with_seed(1);
        let service = build(&repo, Arc::new(repo.clone()));
        let missing = ProblemId::generate();

        let err = service
            .submit_math(missing, 4, &SessionId::new("s"))
            .await
            .unwrap_err();
        assert!(matches!(err, AnswerError::ProblemNotFound(id) if id == missing));
        assert!(repo.get_progress(&SessionId::new("s")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn unknown_exercise_is_not_found() {
        let repo = InMemoryRepository::with_seed(1);
        let service = build(&repo, Arc::new(repo.clone()));

        let err = service
            .submit_english(ExerciseId::generate(), "cat", &SessionId::new("s"))
            .await
            .unwrap_err();
        assert!(matches!(err, AnswerError::ExerciseNotFound(_)));
    }
}
