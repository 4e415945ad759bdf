use super::session::{ChunkOutcome, Session};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// In-memory session map shared by the HTTP handlers.
///
/// Cloning is cheap and every clone refers to the same map. Each operation
/// holds the lock for its whole read-modify-write, so `accept_chunk` is an
/// atomic compare-and-set on `last_chunk_index`.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<Mutex<HashMap<String, Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a fresh session and return its id
    pub async fn create(&self) -> String {
        let mut sessions = self.sessions.lock().await;
        Self::insert_new(&mut sessions).session_id
    }

    /// Look up `session_id`, creating a new session when it is empty or
    /// unknown. The returned session carries the id callers must use from
    /// now on, which differs from the requested one in the repair case.
    pub async fn get_or_create(&self, session_id: &str) -> Session {
        let mut sessions = self.sessions.lock().await;

        let id = session_id.trim();
        if !id.is_empty() {
            if let Some(session) = sessions.get(id) {
                return session.clone();
            }
        }

        if !id.is_empty() {
            info!("Unknown session {}, issuing a new one", id);
        }
        Self::insert_new(&mut sessions)
    }

    /// Snapshot of a session, if it exists
    pub async fn get(&self, session_id: &str) -> Option<Session> {
        let sessions = self.sessions.lock().await;
        sessions.get(session_id).cloned()
    }

    /// Commit a chunk's partial text.
    ///
    /// Accepted iff `chunk_index` is strictly greater than the session's last
    /// accepted index. A session missing from the map is recreated under the
    /// given id.
    pub async fn accept_chunk(&self, session_id: &str, chunk_index: i64, text: &str) -> ChunkOutcome {
        let mut sessions = self.sessions.lock().await;
        let session = sessions
            .entry(session_id.to_string())
            .or_insert_with(|| Session::new(session_id.to_string()));

        let accepted = session.accept_chunk(chunk_index, text);
        if accepted {
            debug!("Session {} accepted chunk {}", session_id, chunk_index);
        } else {
            debug!(
                "Session {} suppressed chunk {} (last accepted {})",
                session_id, chunk_index, session.last_chunk_index
            );
        }

        ChunkOutcome {
            session_id: session.session_id.clone(),
            accepted,
            text: session.text.clone(),
        }
    }

    /// Number of live sessions
    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Insert a fresh session and return a snapshot of it
    fn insert_new(sessions: &mut HashMap<String, Session>) -> Session {
        let session = Session::new(uuid::Uuid::new_v4().to_string());
        sessions.insert(session.session_id.clone(), session.clone());
        info!("Created session {}", session.session_id);
        session
    }
}
