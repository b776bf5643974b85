use crate::errors::AppError;
use crate::state::AppState;
use axum::{
    extract::{Query, Request, State},
    middleware::Next,
    response::Response,
};
use serde::Deserialize;
use tracing::warn;

#[derive(Debug, Deserialize)]
pub struct KeyParams {
    key: Option<String>,
}

pub async fn require_key(
    State(state): State<AppState>,
    Query(params): Query<KeyParams>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    match params.key {
        Some(key) if key.trim() == &*state.access_key => Ok(next.run(request).await),
        _ => {
            warn!(path = %request.uri().path(), "rejected request without a valid key");
            Err(AppError::forbidden())
        }
    }
}
