use crate::model::{EnglishExercise, MathProblem};

/// Exact integer comparison, no tolerance.
#[must_use]
pub fn is_math_correct(problem: &MathProblem, submitted: i64) -> bool {
    submitted == problem.answer
}

/// Case-insensitive substring match against any accepted answer.
///
/// "the cat is nice" is correct for an accepted answer of "cat".
#[must_use]
pub fn is_english_correct(exercise: &EnglishExercise, submitted: &str) -> bool {
    let submitted = submitted.to_lowercase();
    exercise
        .accepted_answers
        .iter()
        .any(|accepted| submitted.contains(&accepted.to_lowercase()))
}

#[must_use]
pub fn math_feedback(problem: &MathProblem, correct: bool) -> String {
    if correct {
        format!(
            "Excellent! {} is correct! Let's try another one.",
            problem.answer
        )
    } else {
        format!(
            "Not quite right. The correct answer is {}. Let's try another problem.",
            problem.answer
        )
    }
}

#[must_use]
pub fn english_feedback(exercise: &EnglishExercise, correct: bool) -> String {
    if correct {
        let explanation = exercise.explanation.as_deref().unwrap_or_default();
        format!("Excellent! That's correct! {explanation} Let's try another one.")
    } else {
        format!("{} Let's try another one.", exercise.correct_answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Difficulty, EnglishKind, ExerciseId, MathKind};
    use crate::time::fixed_now;

    fn exercise(accepted: &[&str], explanation: Option<&str>) -> EnglishExercise {
        EnglishExercise {
            id: ExerciseId::generate(),
            kind: EnglishKind::Spelling,
            question: "How do you spell the word CAT?".into(),
            display: "🐱 CAT".into(),
            accepted_answers: accepted.iter().map(|s| (*s).to_owned()).collect(),
            correct_answer: "The correct spelling is C-A-T".into(),
            explanation: explanation.map(str::to_owned),
            difficulty: Difficulty::Easy,
            created_at: fixed_now(),
        }
    }

    #[test]
    fn math_requires_exact_answer() {
        let p = MathProblem::from_operands(MathKind::Addition, 2, 3, Difficulty::Easy, fixed_now());
        assert!(is_math_correct(&p, 5));
        assert!(!is_math_correct(&p, 6));
        assert!(!is_math_correct(&p, -5));
    }

    #[test]
    fn english_is_case_insensitive_substring() {
        let e = exercise(&["cat", "c a t", "c-a-t"], None);
        assert!(is_english_correct(&e, "THE CAT"));
        assert!(is_english_correct(&e, "the cat is nice"));
        assert!(is_english_correct(&e, "C-A-T"));
        assert!(!is_english_correct(&e, "dog"));
        assert!(!is_english_correct(&e, "ca"));
    }

    #[test]
    fn match_ignores_case_on_both_sides() {
        let e = exercise(&["Elephant"], None);
        assert!(is_english_correct(&e, "an ELEPHANT"));
        assert!(!is_english_correct(&e, "elephan"));
    }

    #[test]
    fn math_feedback_mentions_answer() {
        let p = MathProblem::from_operands(MathKind::Division, 42, 6, Difficulty::Easy, fixed_now());
        assert_eq!(
            math_feedback(&p, true),
            "Excellent! 7 is correct! Let's try another one."
        );
        assert_eq!(
            math_feedback(&p, false),
            "Not quite right. The correct answer is 7. Let's try another problem."
        );
    }

    #[test]
    fn english_feedback_uses_explanation_or_correct_answer() {
        let with = exercise(&["cat"], Some("Cats purr."));
        assert_eq!(
            english_feedback(&with, true),
            "Excellent! That's correct! Cats purr. Let's try another one."
        );
        assert_eq!(
            english_feedback(&with, false),
            "The correct spelling is C-A-T Let's try another one."
        );

        let without = exercise(&["cat"], None);
        assert_eq!(
            english_feedback(&without, true),
            "Excellent! That's correct!  Let's try another one."
        );
    }
}
