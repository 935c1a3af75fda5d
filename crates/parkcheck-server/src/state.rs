use std::sync::Arc;

use jiff::SignedDuration;
use uuid::Uuid;

use parkcheck_chat::ChatBackend;
use parkcheck_model::adapter::ClassifierAdapter;

use crate::error::ApiError;
use crate::session::{Session, SessionStore};

/// Shared application state, injected into all route handlers via Axum state.
#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionStore,
    pub classifier: ClassifierAdapter,
    pub chat: Arc<dyn ChatBackend>,
}

impl AppState {
    pub fn new(classifier: ClassifierAdapter, chat: Arc<dyn ChatBackend>) -> Self {
        Self {
            sessions: SessionStore::default(),
            classifier,
            chat,
        }
    }

    /// Replace the session store with one that expires sessions idle for
    /// `ttl`.
    pub fn with_session_ttl(mut self, ttl: SignedDuration) -> Self {
        self.sessions = SessionStore::new(ttl);
        self
    }

    pub async fn session(&self, id: Uuid) -> Result<Arc<tokio::sync::Mutex<Session>>, ApiError> {
        self.sessions
            .get(id)
            .await
            .ok_or_else(|| ApiError::NotFound(format!("session not found: {id}")))
    }
}
