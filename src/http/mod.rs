//! HTTP API
//!
//! - GET  /health             - Liveness
//! - GET  /stt/models         - Accepted whisper model names
//! - POST /stt/session        - New transcription session
//! - GET  /stt/session/:id    - Session transcript so far
//! - POST /transcribe_chunk   - Transcribe one audio chunk into a session
//! - GET  /ollama/models      - Chat models installed in Ollama
//! - POST /answer             - Spoken-style interview answer

mod error;
mod handlers;
mod routes;
mod state;

pub use error::{ErrorResponse, HttpError};
pub use handlers::{HealthResponse, NewSessionResponse, SttModelsResponse};
pub use routes::{create_router, create_router_with_frontend};
pub use state::AppState;
