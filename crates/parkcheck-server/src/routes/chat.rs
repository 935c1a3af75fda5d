use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use parkcheck_chat::error::ChatError;
use parkcheck_chat::session::{ChatSession, ChatState};
use parkcheck_core::models::transcript::ChatEntry;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Serialize)]
pub struct ChatView {
    state: ChatState,
    /// Visible history; the system instruction is not shown.
    messages: Vec<ChatEntry>,
}

impl From<&ChatSession> for ChatView {
    fn from(chat: &ChatSession) -> Self {
        Self {
            state: chat.state(),
            messages: chat.transcript().visible().to_vec(),
        }
    }
}

#[derive(Deserialize)]
pub struct SendRequest {
    message: String,
}

#[derive(Serialize)]
pub struct ChatReply {
    reply: String,
    #[serde(flatten)]
    view: ChatView,
}

/// Current transcript and state.
///
/// Waits behind an in-flight [`send_message`] on the same session, since
/// that holds the session lock until the reply is recorded; the view
/// returned is therefore never `awaiting_reply`.
pub async fn get_chat(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ChatView>, ApiError> {
    let handle = state.session(id).await?;
    let session = handle.lock().await;
    Ok(Json(ChatView::from(&session.chat)))
}

/// Send one message to the hosted chat model.
///
/// The exchange runs on its own task holding the session lock, so the
/// reply is recorded even if the client goes away, and a session never has
/// two requests in flight.
pub async fn send_message(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<SendRequest>,
) -> Result<Json<ChatReply>, ApiError> {
    let handle = state.session(id).await?;
    let backend = Arc::clone(&state.chat);

    let exchange = tokio::spawn(async move {
        let mut session = handle.lock_owned().await;
        let request = session.chat.begin(&req.message)?;
        let result = tokio::task::spawn_blocking(move || backend.complete(&request))
            .await
            .unwrap_or_else(|e| Err(ChatError::Transport(format!("chat worker failed: {e}"))));
        let reply = session.chat.finish(result)?;
        Ok::<_, ChatError>((reply, ChatView::from(&session.chat)))
    });

    let (reply, view) = exchange
        .await
        .map_err(|e| ApiError::Internal(format!("chat task failed: {e}")))??;
    Ok(Json(ChatReply { reply, view }))
}

pub async fn clear_chat(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ChatView>, ApiError> {
    let handle = state.session(id).await?;
    let mut session = handle.lock().await;
    session.chat.clear();
    Ok(Json(ChatView::from(&session.chat)))
}
