use super::{join_segments, language_hint, DecodeOptions, EngineCache, SpeechEngine, SttModel};
use crate::audio::{AudioContainer, TempAudio};
use crate::session::SessionStore;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info};

/// One uploaded audio chunk
#[derive(Debug, Clone)]
pub struct ChunkRequest {
    pub audio: Vec<u8>,
    /// Client filename, only used for the container hint
    pub filename: String,
    pub session_id: String,
    pub chunk_index: i64,
    pub model: String,
    /// Language code; empty means auto-detect
    pub language: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkResponse {
    /// Session the chunk was applied to (may differ from the requested id)
    pub session_id: String,
    /// Full accumulated transcript
    pub text: String,
    /// This chunk's text, empty when the chunk was suppressed
    pub partial: String,
}

/// Runs chunks through the STT engine and folds the text into sessions
#[derive(Clone)]
pub struct Transcriber {
    sessions: SessionStore,
    engines: EngineCache,
    temp_dir: Option<PathBuf>,
}

impl Transcriber {
    pub fn new(sessions: SessionStore, engines: EngineCache) -> Self {
        Self {
            sessions,
            engines,
            temp_dir: None,
        }
    }

    /// Persist uploads under `dir` instead of the system temp directory
    pub fn with_temp_dir(mut self, dir: PathBuf) -> Self {
        self.temp_dir = Some(dir);
        self
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub async fn transcribe_chunk(&self, req: ChunkRequest) -> Result<ChunkResponse> {
        let session = self.sessions.get_or_create(&req.session_id).await;
        let session_id = session.session_id.clone();

        if !session.accepts(req.chunk_index) {
            debug!(
                "Session {}: chunk {} already covered (last {})",
                session_id, req.chunk_index, session.last_chunk_index
            );
            return Ok(ChunkResponse {
                session_id,
                text: session.text,
                partial: String::new(),
            });
        }

        let container = AudioContainer::from_filename(&req.filename);
        let audio = match &self.temp_dir {
            Some(dir) => TempAudio::persist_in(dir, &req.audio, container)?,
            None => TempAudio::persist(&req.audio, container)?,
        };

        let model = SttModel::from_name(&req.model);
        let options = DecodeOptions::greedy(language_hint(&req.language));
        let engine = self.engines.get(model).await?;
        let segments = engine
            .transcribe(audio.path(), audio.container(), &options)
            .await?;
        drop(audio);

        let partial = join_segments(&segments);
        let outcome = self
            .sessions
            .accept_chunk(&session_id, req.chunk_index, &partial)
            .await;

        if !outcome.accepted {
            // a higher index landed while this chunk was being decoded
            info!(
                "Session {}: chunk {} lost the race to a newer chunk",
                session_id, req.chunk_index
            );
            return Ok(ChunkResponse {
                session_id,
                text: outcome.text,
                partial: String::new(),
            });
        }

        info!(
            "Session {}: chunk {} ({}, {}) -> {} chars",
            session_id,
            req.chunk_index,
            model,
            container.extension(),
            partial.len()
        );

        Ok(ChunkResponse {
            session_id,
            text: outcome.text,
            partial,
        })
    }
}
