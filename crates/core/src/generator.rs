//! Builds the fixed-shape content catalog.
//!
//! Addition, subtraction and multiplication draw operands from the supplied
//! RNG, so two runs differ in values but never in shape. Division and all
//! English content come from fixed tables.

use chrono::{DateTime, Utc};
use rand::Rng;

use crate::model::{
    Difficulty, EnglishExercise, EnglishKind, ExerciseId, MathKind, MathProblem,
};

pub const ADDITION_COUNT: usize = 20;
pub const SUBTRACTION_COUNT: usize = 15;
pub const MULTIPLICATION_COUNT: usize = 15;

/// Dividend/divisor pairs with whole-number quotients.
pub const DIVISION_PAIRS: [(i64, i64); 14] = [
    (10, 2),
    (15, 3),
    (20, 4),
    (25, 5),
    (12, 3),
    (18, 6),
    (24, 8),
    (14, 2),
    (21, 3),
    (28, 4),
    (35, 5),
    (42, 6),
    (49, 7),
    (56, 8),
];

pub const SPELLING_WORDS: [(&str, &str); 20] = [
    ("CAT", "🐱"),
    ("DOG", "🐶"),
    ("BIRD", "🐦"),
    ("FISH", "🐠"),
    ("BOOK", "📖"),
    ("TREE", "🌳"),
    ("HOUSE", "🏠"),
    ("CAR", "🚗"),
    ("BALL", "⚽"),
    ("APPLE", "🍎"),
    ("FLOWER", "🌸"),
    ("MOON", "🌙"),
    ("SUN", "☀️"),
    ("WATER", "💧"),
    ("HAPPY", "😊"),
    ("SCHOOL", "🏫"),
    ("FRIEND", "👫"),
    ("FAMILY", "👨‍👩‍👧‍👦"),
    ("RAINBOW", "🌈"),
    ("BUTTERFLY", "🦋"),
];

/// (word, emoji, prompt, explanation)
pub const VOCABULARY: [(&str, &str, &str, &str); 8] = [
    (
        "elephant",
        "🐘",
        "large animal with a trunk",
        "An elephant is a large animal with a long trunk.",
    ),
    (
        "banana",
        "🍌",
        "yellow fruit that monkeys like",
        "A banana is a yellow fruit that monkeys enjoy eating.",
    ),
    (
        "rain",
        "🌧️",
        "water falling from the sky",
        "Rain is water that falls from clouds in the sky.",
    ),
    (
        "sun",
        "☀️",
        "bright light in the sky during the day",
        "The sun is the bright star that lights up our day.",
    ),
    (
        "ocean",
        "🌊",
        "large body of salt water",
        "An ocean is a very large body of salt water.",
    ),
    (
        "mountain",
        "⛰️",
        "very tall land formation",
        "A mountain is a very tall piece of land.",
    ),
    (
        "doctor",
        "👨‍⚕️",
        "person who helps sick people",
        "A doctor is someone who helps people when they are sick.",
    ),
    (
        "teacher",
        "👩‍🏫",
        "person who helps children learn",
        "A teacher is someone who helps children learn new things.",
    ),
];

/// (prompt, accepted answer, explanation)
pub const GRAMMAR: [(&str, &str, &str); 8] = [
    ("I ___ a student", "am", "The correct answer is 'am' - I am a student"),
    ("She ___ my friend", "is", "The correct answer is 'is' - She is my friend"),
    ("They ___ playing", "are", "The correct answer is 'are' - They are playing"),
    ("We ___ happy", "are", "The correct answer is 'are' - We are happy"),
    ("He ___ tall", "is", "The correct answer is 'is' - He is tall"),
    ("cat → ?", "cats", "The plural of cat is cats"),
    ("dog → ?", "dogs", "The plural of dog is dogs"),
    ("book → ?", "books", "The plural of book is books"),
];

//
// ─── MATH ──────────────────────────────────────────────────────────────────────
//

/// Generate the full math catalog: 20 addition, 15 subtraction,
/// 15 multiplication and 14 division problems.
#[must_use]
pub fn math_problems<R: Rng + ?Sized>(rng: &mut R, now: DateTime<Utc>) -> Vec<MathProblem> {
    let total = ADDITION_COUNT + SUBTRACTION_COUNT + MULTIPLICATION_COUNT + DIVISION_PAIRS.len();
    let mut problems = Vec::with_capacity(total);

    for i in 0..ADDITION_COUNT {
        let (a, b, difficulty) = if i < 10 {
            (rng.random_range(1..=10), rng.random_range(1..=10), Difficulty::Easy)
        } else {
            (rng.random_range(10..=50), rng.random_range(1..=20), Difficulty::Medium)
        };
        problems.push(MathProblem::from_operands(MathKind::Addition, a, b, difficulty, now));
    }

    for i in 0..SUBTRACTION_COUNT {
        let (a, b, difficulty) = if i < 8 {
            let a = rng.random_range(5..=20);
            (a, rng.random_range(1..=a), Difficulty::Easy)
        } else {
            (rng.random_range(20..=100), rng.random_range(1..=50), Difficulty::Medium)
        };
        problems.push(MathProblem::from_operands(MathKind::Subtraction, a, b, difficulty, now));
    }

    for i in 0..MULTIPLICATION_COUNT {
        let (a, b, difficulty) = if i < 8 {
            (rng.random_range(1..=5), rng.random_range(1..=10), Difficulty::Easy)
        } else {
            (rng.random_range(2..=12), rng.random_range(2..=12), Difficulty::Medium)
        };
        problems.push(MathProblem::from_operands(
            MathKind::Multiplication,
            a,
            b,
            difficulty,
            now,
        ));
    }

    for (a, b) in DIVISION_PAIRS {
        let difficulty = if a / b <= 10 {
            Difficulty::Easy
        } else {
            Difficulty::Medium
        };
        problems.push(MathProblem::from_operands(MathKind::Division, a, b, difficulty, now));
    }

    problems
}

//
// ─── ENGLISH ───────────────────────────────────────────────────────────────────
//

/// Generate the full English catalog: 20 spelling, 8 vocabulary and 8 grammar exercises.
#[must_use]
pub fn english_exercises(now: DateTime<Utc>) -> Vec<EnglishExercise> {
    let mut exercises =
        Vec::with_capacity(SPELLING_WORDS.len() + VOCABULARY.len() + GRAMMAR.len());

    for (word, emoji) in SPELLING_WORDS {
        exercises.push(spelling_exercise(word, emoji, now));
    }

    for (word, emoji, prompt, explanation) in VOCABULARY {
        exercises.push(EnglishExercise {
            id: ExerciseId::generate(),
            kind: EnglishKind::Vocabulary,
            question: format!("What is {prompt}?"),
            display: format!("{emoji} {prompt}"),
            accepted_answers: vec![word.to_owned()],
            correct_answer: format!("The answer is {word}"),
            explanation: Some(explanation.to_owned()),
            difficulty: Difficulty::Easy,
            created_at: now,
        });
    }

    for (prompt, answer, explanation) in GRAMMAR {
        exercises.push(EnglishExercise {
            id: ExerciseId::generate(),
            kind: EnglishKind::Grammar,
            question: format!("Fill in the blank or complete: {prompt}"),
            display: prompt.to_owned(),
            accepted_answers: vec![answer.to_owned()],
            correct_answer: explanation.to_owned(),
            explanation: None,
            difficulty: Difficulty::Easy,
            created_at: now,
        });
    }

    exercises
}

fn spelling_exercise(word: &str, emoji: &str, now: DateTime<Utc>) -> EnglishExercise {
    let lower = word.to_lowercase();
    let letters: Vec<String> = lower.chars().map(String::from).collect();
    let upper_letters: Vec<String> = word.chars().map(String::from).collect();
    let difficulty = if word.chars().count() <= 4 {
        Difficulty::Easy
    } else {
        Difficulty::Medium
    };

    EnglishExercise {
        id: ExerciseId::generate(),
        kind: EnglishKind::Spelling,
        question: format!("How do you spell the word {word}?"),
        display: format!("{emoji} {word}"),
        accepted_answers: vec![lower.clone(), letters.join(" "), letters.join("-")],
        correct_answer: format!("The correct spelling is {}", upper_letters.join("-")),
        explanation: None,
        difficulty,
        created_at: now,
    }
}
