use axum::{
    Json,
    extract::{Path, Query, State},
};
use quiz_core::model::{
    Difficulty, EnglishExercise, EnglishFilter, EnglishKind, ExerciseId, MathFilter, MathKind,
    MathProblem, ProblemId, SessionId, SessionProgress,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use services::AppServices;

use crate::error::{ApiError, content_error};

const BANNER: &str = "EduAssist API - Voice-powered learning for everyone!";

//
// ─── QUERY / BODY TYPES ──────────────────────────────────────────────────────
//

#[derive(Debug, Default, Deserialize)]
pub struct ContentQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub difficulty: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MathAnswerRequest {
    pub problem_id: String,
    pub user_answer: i64,
    pub session_id: String,
}

#[derive(Debug, Serialize)]
pub struct MathAnswerResponse {
    pub correct: bool,
    pub feedback: String,
    pub next_problem: Option<MathProblem>,
}

#[derive(Debug, Deserialize)]
pub struct EnglishAnswerRequest {
    pub exercise_id: String,
    pub user_answer: String,
    pub session_id: String,
}

#[derive(Debug, Serialize)]
pub struct EnglishAnswerResponse {
    pub correct: bool,
    pub feedback: String,
    pub next_exercise: Option<EnglishExercise>,
}

//
// ─── FILTER PARSING ──────────────────────────────────────────────────────────
//

/// Blank and `all` mean "no constraint". Any other value must parse; a value
/// that does not is reported as `Err(())` since it can never match.
fn parse_optional<T: std::str::FromStr>(raw: Option<&str>) -> Result<Option<T>, ()> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) if value.eq_ignore_ascii_case("all") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(|_| ()),
    }
}

fn math_filter(query: &ContentQuery) -> Option<MathFilter> {
    let kind = parse_optional::<MathKind>(query.kind.as_deref()).ok()?;
    let difficulty = parse_optional::<Difficulty>(query.difficulty.as_deref()).ok()?;
    Some(MathFilter::new(kind, difficulty))
}

fn english_filter(query: &ContentQuery) -> Option<EnglishFilter> {
    let kind = match query.kind.as_deref().map(str::trim) {
        None | Some("") => EnglishKind::default(),
        Some(raw) => raw.parse().ok()?,
    };
    let difficulty = parse_optional::<Difficulty>(query.difficulty.as_deref()).ok()?;
    Some(EnglishFilter::new(Some(kind), difficulty))
}

//
// ─── GET /api/ ───────────────────────────────────────────────────────────────
//

pub async fn root() -> Json<Value> {
    Json(json!({ "message": BANNER }))
}

//
// ─── GET /api/math/problems ──────────────────────────────────────────────────
//

pub async fn math_problem(
    State(app): State<AppServices>,
    Query(query): Query<ContentQuery>,
) -> Result<Json<MathProblem>, ApiError> {
    const MISSING: &str = "No problems found";

    let filter = math_filter(&query).ok_or(ApiError::NotFound(MISSING))?;
    let problem = app
        .content()
        .random_math_problem(filter)
        .await
        .map_err(content_error(MISSING))?;
    Ok(Json(problem))
}

//
// ─── POST /api/math/answer ───────────────────────────────────────────────────
//

pub async fn submit_math_answer(
    State(app): State<AppServices>,
    Json(body): Json<MathAnswerRequest>,
) -> Result<Json<MathAnswerResponse>, ApiError> {
    // an id that cannot parse cannot exist either
    let problem_id: ProblemId = body
        .problem_id
        .parse()
        .map_err(|_| ApiError::NotFound("Problem not found"))?;
    let session_id = SessionId::from(body.session_id);

    let graded = app
        .answers()
        .submit_math(problem_id, body.user_answer, &session_id)
        .await?;

    Ok(Json(MathAnswerResponse {
        correct: graded.correct,
        feedback: graded.feedback,
        next_problem: graded.next,
    }))
}

//
// ─── GET /api/english/exercises ──────────────────────────────────────────────
//

pub async fn english_exercise(
    State(app): State<AppServices>,
    Query(query): Query<ContentQuery>,
) -> Result<Json<EnglishExercise>, ApiError> {
    const MISSING: &str = "No exercises found";

    let filter = english_filter(&query).ok_or(ApiError::NotFound(MISSING))?;
    let exercise = app
        .content()
        .random_english_exercise(filter)
        .await
        .map_err(content_error(MISSING))?;
    Ok(Json(exercise))
}

//
// ─── POST /api/english/answer ────────────────────────────────────────────────
//

pub async fn submit_english_answer(
    State(app): State<AppServices>,
    Json(body): Json<EnglishAnswerRequest>,
) -> Result<Json<EnglishAnswerResponse>, ApiError> {
    let exercise_id: ExerciseId = body
        .exercise_id
        .parse()
        .map_err(|_| ApiError::NotFound("Exercise not found"))?;
    let session_id = SessionId::from(body.session_id);

    let graded = app
        .answers()
        .submit_english(exercise_id, &body.user_answer, &session_id)
        .await?;

    Ok(Json(EnglishAnswerResponse {
        correct: graded.correct,
        feedback: graded.feedback,
        next_exercise: graded.next,
    }))
}

//
// ─── GET /api/progress/{session_id} ──────────────────────────────────────────
//

pub async fn progress(
    State(app): State<AppServices>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionProgress>, ApiError> {
    let progress = app
        .progress()
        .get_or_create(&SessionId::from(session_id))
        .await?;
    Ok(Json(progress))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(kind: Option<&str>, difficulty: Option<&str>) -> ContentQuery {
        ContentQuery {
            kind: kind.map(str::to_owned),
            difficulty: difficulty.map(str::to_owned),
        }
    }

    #[test]
    fn math_all_and_blank_mean_unfiltered() {
        assert_eq!(math_filter(&query(None, None)), Some(MathFilter::default()));
        assert_eq!(math_filter(&query(Some("all"), Some(""))), Some(MathFilter::default()));
        assert_eq!(
            math_filter(&query(Some("division"), Some("easy"))),
            Some(MathFilter::new(Some(MathKind::Division), Some(Difficulty::Easy)))
        );
    }

    #[test]
    fn unknown_values_cannot_match() {
        assert_eq!(math_filter(&query(Some("modulo"), None)), None);
        assert_eq!(math_filter(&query(None, Some("hard"))), None);
        assert_eq!(english_filter(&query(Some("poetry"), None)), None);
    }

    #[test]
    fn english_defaults_to_spelling() {
        assert_eq!(
            english_filter(&query(None, None)),
            Some(EnglishFilter::new(Some(EnglishKind::Spelling), None))
        );
        assert_eq!(
            english_filter(&query(Some("grammar"), Some("easy"))),
            Some(EnglishFilter::new(Some(EnglishKind::Grammar), Some(Difficulty::Easy)))
        );
    }
}
