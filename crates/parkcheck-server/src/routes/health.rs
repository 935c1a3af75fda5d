use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthStatus {
    status: &'static str,
    model_loaded: bool,
    chat_configured: bool,
    sessions: usize,
}

pub async fn health_check(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        model_loaded: state.classifier.is_available(),
        chat_configured: state.chat.is_configured(),
        sessions: state.sessions.len().await,
    })
}
