pub mod app;
pub mod audio;
pub mod chat;
pub mod config;
pub mod http;
pub mod session;
pub mod stt;

pub use app::build_state;
pub use audio::{AudioContainer, TempAudio};
pub use chat::{AnswerRequest, AnswerResponse, AnswerService, ChatEngine, ChatError, OllamaClient, Tone};
pub use config::Config;
pub use http::{create_router, create_router_with_frontend, AppState};
pub use session::{ChunkOutcome, Session, SessionStore};
pub use stt::{
    ChunkRequest, ChunkResponse, DecodeOptions, EngineCache, EngineLoader, Segment, SpeechEngine,
    SttModel, Transcriber,
};
