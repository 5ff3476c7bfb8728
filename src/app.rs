use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/form", post(handlers::submit_page_form))
        .route("/reset", post(handlers::reset_page))
        .route("/view/:view", post(handlers::switch_view_page))
        .route("/api/state", get(handlers::get_state))
        .route("/api/draft", post(handlers::update_draft))
        .route("/api/submit", post(handlers::submit))
        .route("/api/reset", post(handlers::reset))
        .route("/api/view", post(handlers::set_view))
        .route("/api/dashboard", get(handlers::get_dashboard))
        .route("/api/health", get(handlers::health))
        .with_state(state)
}
