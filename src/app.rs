use crate::handlers;
use crate::state::AppState;
use axum::{
    Router,
    routing::{delete, get, post},
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/theme", get(handlers::get_theme))
        .route("/api/prompt", get(handlers::get_prompt))
        .route("/api/analyze", post(handlers::analyze))
        .route("/api/analysis/latest", get(handlers::latest_analysis))
        .route("/api/theory", get(handlers::get_theory))
        .route("/api/theory/examples", get(handlers::get_examples))
        .route("/api/challenges", get(handlers::get_challenges))
        .route("/api/challenges/:id/submit", post(handlers::submit_challenge))
        .route("/api/progress", get(handlers::get_progress))
        .route("/api/mistakes", post(handlers::add_mistake))
        .route("/api/mistakes/:id", delete(handlers::delete_mistake))
        .route("/api/completed/:id", delete(handlers::delete_completed))
        .with_state(state)
}
