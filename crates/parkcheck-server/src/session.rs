use std::collections::HashMap;
use std::sync::Arc;

use jiff::{SignedDuration, Timestamp};
use tokio::sync::Mutex;
use uuid::Uuid;

use parkcheck_chat::session::ChatSession;
use parkcheck_core::models::reading::ClinicalForm;
use parkcheck_instruments::assessment::Answers;

/// Idle time after which a session is forgotten.
pub const DEFAULT_SESSION_TTL: SignedDuration = SignedDuration::from_mins(30);

/// Everything one user has entered across the three panels.
///
/// Lives only in memory and only for as long as the session exists.
#[derive(Debug)]
pub struct Session {
    pub id: Uuid,
    pub created_at: Timestamp,
    pub form: ClinicalForm,
    pub answers: Answers,
    pub chat: ChatSession,
}

impl Session {
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            created_at: Timestamp::now(),
            form: ClinicalForm::default(),
            answers: Answers::default(),
            chat: ChatSession::new(),
        }
    }
}

struct Entry {
    session: Arc<Mutex<Session>>,
    /// Updated on every lookup, outside the session lock.
    last_seen: Timestamp,
}

/// In-memory session registry.
///
/// Each session sits behind its own lock, held for the whole of a request,
/// so actions on one session run one at a time while other sessions
/// proceed independently. Sessions idle for `ttl` or longer are dropped,
/// lazily on lookup and by [`evict_idle`](Self::evict_idle).
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<Mutex<HashMap<Uuid, Entry>>>,
    ttl: SignedDuration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_TTL)
    }
}

impl SessionStore {
    pub fn new(ttl: SignedDuration) -> Self {
        Self {
            sessions: Arc::default(),
            ttl,
        }
    }

    pub fn ttl(&self) -> SignedDuration {
        self.ttl
    }

    pub async fn create(&self) -> (Uuid, Timestamp) {
        let id = Uuid::new_v4();
        let session = Session::new(id);
        let created_at = session.created_at;

        let mut sessions = self.sessions.lock().await;
        self.evict_locked(&mut sessions, created_at);
        sessions.insert(
            id,
            Entry {
                session: Arc::new(Mutex::new(session)),
                last_seen: created_at,
            },
        );
        (id, created_at)
    }

    /// Look up a live session and mark it as seen.
    pub async fn get(&self, id: Uuid) -> Option<Arc<Mutex<Session>>> {
        let now = Timestamp::now();
        let mut sessions = self.sessions.lock().await;
        let entry = sessions.get_mut(&id)?;
        if self.is_idle(entry, now) {
            sessions.remove(&id);
            tracing::info!(session = %id, "session expired");
            return None;
        }
        entry.last_seen = now;
        Some(Arc::clone(&entry.session))
    }

    pub async fn remove(&self, id: Uuid) -> bool {
        self.sessions.lock().await.remove(&id).is_some()
    }

    /// Drop every session idle for at least the TTL. Returns how many went.
    pub async fn evict_idle(&self) -> usize {
        self.evict_idle_at(Timestamp::now()).await
    }

    pub async fn evict_idle_at(&self, now: Timestamp) -> usize {
        let mut sessions = self.sessions.lock().await;
        self.evict_locked(&mut sessions, now)
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn is_idle(&self, entry: &Entry, now: Timestamp) -> bool {
        now.duration_since(entry.last_seen) >= self.ttl
    }

    fn evict_locked(&self, sessions: &mut HashMap<Uuid, Entry>, now: Timestamp) -> usize {
        let before = sessions.len();
        sessions.retain(|_, entry| !self.is_idle(entry, now));
        let evicted = before - sessions.len();
        if evicted > 0 {
            tracing::info!(evicted, "expired idle sessions");
        }
        evicted
    }
}
