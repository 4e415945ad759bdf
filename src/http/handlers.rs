use super::error::HttpError;
use super::state::AppState;
use crate::chat::{AnswerRequest, AnswerResponse, ModelsResponse};
use crate::session::Session;
use crate::stt::{ChunkRequest, ChunkResponse, SttModel};
use axum::{
    extract::{Multipart, Path, State},
    response::Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub service: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SttModelsResponse {
    pub models: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NewSessionResponse {
    pub session_id: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        service: state.service_name.clone(),
    })
}

/// GET /stt/models
/// Whisper model names accepted by /transcribe_chunk
pub async fn stt_models() -> Json<SttModelsResponse> {
    Json(SttModelsResponse {
        models: SttModel::names().into_iter().map(String::from).collect(),
    })
}

/// POST /stt/session
/// Start a new transcription session
pub async fn create_session(State(state): State<AppState>) -> Json<NewSessionResponse> {
    let session_id = state.sessions().create().await;
    Json(NewSessionResponse { session_id })
}

/// GET /stt/session/:session_id
/// Current transcript of a session
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<Session>, HttpError> {
    state
        .sessions()
        .get(&session_id)
        .await
        .map(Json)
        .ok_or_else(|| HttpError::not_found(format!("Session {} not found", session_id)))
}

/// POST /transcribe_chunk
/// Multipart fields: audio (file), session_id, chunk_index, model, language
pub async fn transcribe_chunk(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ChunkResponse>, HttpError> {
    let req = read_chunk_form(multipart).await?;
    info!(
        "Chunk {} for session '{}' ({} bytes, model={})",
        req.chunk_index,
        req.session_id,
        req.audio.len(),
        req.model
    );

    let resp = state.transcriber.transcribe_chunk(req).await?;
    Ok(Json(resp))
}

/// GET /ollama/models
/// Models installed in the chat engine; empty list plus `error` on failure
pub async fn chat_models(State(state): State<AppState>) -> Json<ModelsResponse> {
    Json(state.answers.list_models().await)
}

/// POST /answer
/// Always 200; engine problems are reported inside `answer`
pub async fn answer(
    State(state): State<AppState>,
    Json(req): Json<AnswerRequest>,
) -> Json<AnswerResponse> {
    Json(state.answers.answer(&req).await)
}

async fn read_chunk_form(mut multipart: Multipart) -> Result<ChunkRequest, HttpError> {
    let mut audio: Option<(String, Vec<u8>)> = None;
    let mut session_id = String::new();
    let mut chunk_index: Option<String> = None;
    let mut model = SttModel::default().as_str().to_string();
    let mut language = "en".to_string();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "audio" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await?;
                audio = Some((filename, bytes.to_vec()));
            }
            "session_id" => session_id = field.text().await?,
            "chunk_index" => chunk_index = Some(field.text().await?),
            "model" => model = field.text().await?,
            "language" => language = field.text().await?,
            _ => {}
        }
    }

    let (filename, audio) = audio.ok_or_else(|| HttpError::bad_request("Missing 'audio' file field"))?;
    let raw_index = chunk_index.ok_or_else(|| HttpError::bad_request("Missing 'chunk_index' field"))?;
    let chunk_index = raw_index
        .trim()
        .parse::<i64>()
        .map_err(|_| HttpError::bad_request(format!("Invalid chunk_index '{}'", raw_index)))?;

    Ok(ChunkRequest {
        audio,
        filename,
        session_id,
        chunk_index,
        model,
        language,
    })
}
