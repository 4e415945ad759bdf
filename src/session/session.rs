use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Chunk index of a session that has not accepted anything yet
pub const NO_CHUNK: i64 = -1;

/// One client's incremental transcription stream
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Opaque unique identifier (UUID v4)
    pub session_id: String,

    /// Space-joined text of every accepted chunk
    pub text: String,

    /// Highest chunk index accepted so far
    pub last_chunk_index: i64,

    /// When the session was created
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn new(session_id: String) -> Self {
        Self {
            session_id,
            text: String::new(),
            last_chunk_index: NO_CHUNK,
            created_at: Utc::now(),
        }
    }

    /// Whether a chunk with this index would be accepted
    pub fn accepts(&self, chunk_index: i64) -> bool {
        chunk_index > self.last_chunk_index
    }

    /// Commit a chunk if its index advances the session.
    ///
    /// Returns `false` (and leaves the session untouched) for duplicate or
    /// out-of-order indices.
    pub fn accept_chunk(&mut self, chunk_index: i64, partial: &str) -> bool {
        if !self.accepts(chunk_index) {
            return false;
        }

        self.last_chunk_index = chunk_index;

        let partial = partial.trim();
        if !partial.is_empty() {
            self.text = format!("{} {}", self.text, partial).trim().to_string();
        }

        true
    }
}

/// Result of committing a chunk to the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkOutcome {
    pub session_id: String,
    pub accepted: bool,
    /// Accumulated text after the commit attempt
    pub text: String,
}
