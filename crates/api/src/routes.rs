use axum::{
    Router,
    routing::{get, post},
};
use services::AppServices;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;

/// The full HTTP surface, mounted under `/api`.
pub fn router(services: AppServices) -> Router {
    Router::new()
        .route("/api", get(handlers::root))
        .route("/api/", get(handlers::root))
        .route("/api/math/problems", get(handlers::math_problem))
        .route("/api/math/answer", post(handlers::submit_math_answer))
        .route("/api/english/exercises", get(handlers::english_exercise))
        .route("/api/english/answer", post(handlers::submit_english_answer))
        .route("/api/progress/{session_id}", get(handlers::progress))
        .with_state(services)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
