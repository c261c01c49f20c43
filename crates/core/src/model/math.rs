use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::ids::ProblemId;
use crate::model::kind::{Difficulty, MathKind};

/// A generated arithmetic question. Immutable once generated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MathProblem {
    pub id: ProblemId,
    pub question: String,
    pub display: String,
    pub answer: i64,
    #[serde(rename = "type")]
    pub kind: MathKind,
    pub difficulty: Difficulty,
    pub created_at: DateTime<Utc>,
}

impl MathProblem {
    /// Build a problem for `a <op> b` with a fresh identifier.
    ///
    /// Division uses integer division; callers only pass exact pairs.
    #[must_use]
    pub fn from_operands(
        kind: MathKind,
        a: i64,
        b: i64,
        difficulty: Difficulty,
        created_at: DateTime<Utc>,
    ) -> Self {
        let (word, symbol, answer) = match kind {
            MathKind::Addition => ("plus", "+", a + b),
            MathKind::Subtraction => ("minus", "-", a - b),
            MathKind::Multiplication => ("times", "×", a * b),
            MathKind::Division => ("divided by", "÷", a / b),
        };

        Self {
            id: ProblemId::generate(),
            question: format!("What is {a} {word} {b}?"),
            display: format!("{a} {symbol} {b} = ?"),
            answer,
            kind,
            difficulty,
            created_at,
        }
    }
}

/// Equality filter for sampling; `None` fields match anything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MathFilter {
    pub kind: Option<MathKind>,
    pub difficulty: Option<Difficulty>,
}

impl MathFilter {
    #[must_use]
    pub fn new(kind: Option<MathKind>, difficulty: Option<Difficulty>) -> Self {
        Self { kind, difficulty }
    }

    /// Filter selecting problems of the same type and difficulty.
    #[must_use]
    pub fn like(problem: &MathProblem) -> Self {
        Self::new(Some(problem.kind), Some(problem.difficulty))
    }

    #[must_use]
    pub fn matches(&self, problem: &MathProblem) -> bool {
        self.kind.is_none_or(|k| k == problem.kind)
            && self.difficulty.is_none_or(|d| d == problem.difficulty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn builds_question_and_display_from_operands() {
        let p = MathProblem::from_operands(MathKind::Multiplication, 3, 4, Difficulty::Easy, fixed_now());
        assert_eq!(p.question, "What is 3 times 4?");
        assert_eq!(p.display, "3 × 4 = ?");
        assert_eq!(p.answer, 12);
    }

    #[test]
    fn subtraction_may_go_negative() {
        let p = MathProblem::from_operands(MathKind::Subtraction, 20, 50, Difficulty::Medium, fixed_now());
        assert_eq!(p.answer, -30);
        assert_eq!(p.question, "What is 20 minus 50?");
    }

    #[test]
    fn filter_matches_on_present_fields_only() {
        let p = MathProblem::from_operands(MathKind::Division, 10, 2, Difficulty::Easy, fixed_now());
        assert!(MathFilter::default().matches(&p));
        assert!(MathFilter::new(Some(MathKind::Division), None).matches(&p));
        assert!(!MathFilter::new(None, Some(Difficulty::Medium)).matches(&p));
        assert!(MathFilter::like(&p).matches(&p));
    }

    #[test]
    fn serializes_kind_as_type() {
        let p = MathProblem::from_operands(MathKind::Addition, 1, 2, Difficulty::Easy, fixed_now());
        let value = serde_json::to_value(&p).unwrap();
        assert_eq!(value["type"], "addition");
        assert_eq!(value["difficulty"], "easy");
        assert_eq!(value["answer"], 3);
        assert!(value.get("kind").is_none());
    }
}
