use crate::chat::AnswerService;
use crate::session::SessionStore;
use crate::stt::Transcriber;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Reported by `/health`
    pub service_name: String,

    /// Chunk transcription (owns the session store and engine cache)
    pub transcriber: Transcriber,

    /// Interview answers via the chat engine
    pub answers: AnswerService,
}

impl AppState {
    pub fn new(service_name: impl Into<String>, transcriber: Transcriber, answers: AnswerService) -> Self {
        Self {
            service_name: service_name.into(),
            transcriber,
            answers,
        }
    }

    pub fn sessions(&self) -> &SessionStore {
        self.transcriber.sessions()
    }
}
