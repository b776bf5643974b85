use crate::auth::require_key;
use crate::handlers;
use crate::state::AppState;
use axum::{
    Router, middleware,
    routing::{get, post},
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/recents", get(handlers::recents_page))
        .route("/summary", get(handlers::summary_page))
        .route("/explanations", get(handlers::explanations_page))
        .route("/api/entry", post(handlers::add_entry))
        .route(
            "/api/entry/:entry_idx",
            get(handlers::get_entry).put(handlers::update_entry),
        )
        .route("/api/data", get(handlers::get_range))
        .route(
            "/api/length",
            get(handlers::get_length).post(handlers::set_length),
        )
        .route("/api/recents", get(handlers::get_recents))
        .layer(middleware::from_fn_with_state(state.clone(), require_key))
        .with_state(state)
}
