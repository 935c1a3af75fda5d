use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Serialize;
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Serialize)]
pub struct SessionCreated {
    id: Uuid,
    created_at: jiff::Timestamp,
}

pub async fn create_session(State(state): State<AppState>) -> (StatusCode, Json<SessionCreated>) {
    let (id, created_at) = state.sessions.create().await;
    tracing::info!(session = %id, "session created");
    (StatusCode::CREATED, Json(SessionCreated { id, created_at }))
}

/// End a session and drop everything entered in it.
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if !state.sessions.remove(id).await {
        return Err(ApiError::NotFound(format!("session not found: {id}")));
    }
    tracing::info!(session = %id, "session ended");
    Ok(StatusCode::NO_CONTENT)
}
