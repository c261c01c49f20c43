use quiz_core::model::{
    Difficulty, EnglishExercise, EnglishKind, ExerciseId, MathKind, MathProblem, ProblemId,
    ProgressId, SessionId, SessionProgress,
};
use sqlx::Row;

use crate::repository::StorageError;

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

fn u32_from_i64(field: &'static str, v: i64) -> Result<u32, StorageError> {
    u32::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid {field}: {v}")))
}

/// Maps write failures, turning unique-key violations into `Conflict`.
pub(crate) fn write_err(e: sqlx::Error) -> StorageError {
    match e.as_database_error() {
        Some(db) if db.is_unique_violation() => StorageError::Conflict,
        _ => StorageError::Connection(e.to_string()),
    }
}

pub(crate) fn read_err(e: sqlx::Error) -> StorageError {
    StorageError::Connection(e.to_string())
}

pub(crate) fn count_from_i64(v: i64) -> Result<u64, StorageError> {
    u64::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid count: {v}")))
}

pub(crate) fn map_problem_row(row: &sqlx::sqlite::SqliteRow) -> Result<MathProblem, StorageError> {
    let id: ProblemId = row.try_get::<String, _>("id").map_err(ser)?.parse().map_err(ser)?;
    let kind: MathKind = row.try_get::<String, _>("kind").map_err(ser)?.parse().map_err(ser)?;
    let difficulty: Difficulty = row
        .try_get::<String, _>("difficulty")
        .map_err(ser)?
        .parse()
        .map_err(ser)?;

    Ok(MathProblem {
        id,
        question: row.try_get("question").map_err(ser)?,
        display: row.try_get("display").map_err(ser)?,
        answer: row.try_get("answer").map_err(ser)?,
        kind,
        difficulty,
        created_at: row.try_get("created_at").map_err(ser)?,
    })
}

pub(crate) fn map_exercise_row(
    row: &sqlx::sqlite::SqliteRow,
) -> Result<EnglishExercise, StorageError> {
    let id: ExerciseId = row.try_get::<String, _>("id").map_err(ser)?.parse().map_err(ser)?;
    let kind: EnglishKind = row.try_get::<String, _>("kind").map_err(ser)?.parse().map_err(ser)?;
    let difficulty: Difficulty = row
        .try_get::<String, _>("difficulty")
        .map_err(ser)?
        .parse()
        .map_err(ser)?;
    let accepted_json: String = row.try_get("accepted_answers").map_err(ser)?;
    let accepted_answers: Vec<String> = serde_json::from_str(&accepted_json).map_err(ser)?;

    Ok(EnglishExercise {
        id,
        kind,
        question: row.try_get("question").map_err(ser)?,
        display: row.try_get("display").map_err(ser)?,
        accepted_answers,
        correct_answer: row.try_get("correct_answer").map_err(ser)?,
        explanation: row.try_get("explanation").map_err(ser)?,
        difficulty,
        created_at: row.try_get("created_at").map_err(ser)?,
    })
}

pub(crate) fn map_progress_row(
    row: &sqlx::sqlite::SqliteRow,
) -> Result<SessionProgress, StorageError> {
    let id: ProgressId = row.try_get::<String, _>("id").map_err(ser)?.parse().map_err(ser)?;
    let session_id = SessionId::new(row.try_get::<String, _>("session_id").map_err(ser)?);
    let count = |field: &'static str| -> Result<u32, StorageError> {
        u32_from_i64(field, row.try_get::<i64, _>(field).map_err(ser)?)
    };

    Ok(SessionProgress::from_persisted(
        id,
        session_id,
        count("math_score")?,
        count("english_score")?,
        count("math_streak")?,
        count("english_streak")?,
        count("problems_solved")?,
        row.try_get("last_activity").map_err(ser)?,
        row.try_get("expires_at").map_err(ser)?,
    ))
}

pub(crate) fn accepted_answers_json(answers: &[String]) -> Result<String, StorageError> {
    serde_json::to_string(answers).map_err(ser)
}
