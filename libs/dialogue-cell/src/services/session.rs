//! In-memory session store.
//!
//! Each session's state sits behind its own mutex, so two requests carrying
//! the same session id are serialized into one in-flight turn at a time
//! while different sessions proceed in parallel. Sessions idle longer than
//! the TTL are evicted on the next store access.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};
use uuid::Uuid;

use crate::models::ConversationState;

pub type SessionHandle = Arc<Mutex<ConversationState>>;

struct SessionEntry {
    state: SessionHandle,
    last_seen: Instant,
}

pub struct SessionStore {
    sessions: RwLock<HashMap<String, SessionEntry>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl_minutes: i64) -> Self {
        Self::with_ttl(Duration::from_secs(ttl_minutes.max(1) as u64 * 60))
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Fetch the session for `session_id`, creating one (with a fresh uuid
    /// when no id was supplied) if it does not exist. Stale sessions are
    /// swept on every call.
    pub async fn get_or_create(&self, session_id: Option<String>) -> (String, SessionHandle) {
        let mut sessions = self.sessions.write().await;
        Self::evict_stale(&mut sessions, self.ttl);

        if let Some(id) = &session_id {
            if let Some(entry) = sessions.get_mut(id) {
                entry.last_seen = Instant::now();
                return (id.clone(), Arc::clone(&entry.state));
            }
        }

        let id = session_id.unwrap_or_else(|| Uuid::new_v4().to_string());
        debug!("Creating session {}", id);
        let state = Arc::new(Mutex::new(ConversationState::new(id.clone())));
        sessions.insert(
            id.clone(),
            SessionEntry {
                state: Arc::clone(&state),
                last_seen: Instant::now(),
            },
        );
        (id, state)
    }

    /// Look up an existing session without creating one.
    pub async fn get(&self, session_id: &str) -> Option<SessionHandle> {
        let mut sessions = self.sessions.write().await;
        Self::evict_stale(&mut sessions, self.ttl);

        sessions.get_mut(session_id).map(|entry| {
            entry.last_seen = Instant::now();
            Arc::clone(&entry.state)
        })
    }

    /// Remove a session; returns whether it existed.
    pub async fn remove(&self, session_id: &str) -> bool {
        self.sessions.write().await.remove(session_id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    fn evict_stale(sessions: &mut HashMap<String, SessionEntry>, ttl: Duration) {
        let before = sessions.len();
        sessions.retain(|_, entry| entry.last_seen.elapsed() < ttl);
        let evicted = before - sessions.len();
        if evicted > 0 {
            info!("Evicted {} idle session(s)", evicted);
        }
    }
}
