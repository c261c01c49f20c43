use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::ids::ExerciseId;
use crate::model::kind::{Difficulty, EnglishKind};

/// A generated spelling, vocabulary, or grammar exercise. Immutable once generated.
///
/// `correct_answer` is the canonical explanation shown after a wrong answer;
/// `explanation` is optional extra text shown after a right one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnglishExercise {
    pub id: ExerciseId,
    #[serde(rename = "type")]
    pub kind: EnglishKind,
    pub question: String,
    pub display: String,
    pub accepted_answers: Vec<String>,
    pub correct_answer: String,
    pub explanation: Option<String>,
    pub difficulty: Difficulty,
    pub created_at: DateTime<Utc>,
}

/// Equality filter for sampling; `None` fields match anything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnglishFilter {
    pub kind: Option<EnglishKind>,
    pub difficulty: Option<Difficulty>,
}

impl EnglishFilter {
    #[must_use]
    pub fn new(kind: Option<EnglishKind>, difficulty: Option<Difficulty>) -> Self {
        Self { kind, difficulty }
    }

    /// Filter selecting exercises of the same type, any difficulty.
    #[must_use]
    pub fn like(exercise: &EnglishExercise) -> Self {
        Self::new(Some(exercise.kind), None)
    }

    #[must_use]
    pub fn matches(&self, exercise: &EnglishExercise) -> bool {
        self.kind.is_none_or(|k| k == exercise.kind)
            && self.difficulty.is_none_or(|d| d == exercise.difficulty)
    }
}
