use super::handlers;
use super::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::path::Path;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

/// Upload ceiling for a single audio chunk
const MAX_CHUNK_BYTES: usize = 25 * 1024 * 1024;

/// Create the HTTP router with all API routes
pub fn create_router(state: AppState) -> Router {
    build_router(state, None)
}

/// API routes plus the frontend: `/` serves index.html, `/static/*` the directory
pub fn create_router_with_frontend(state: AppState, static_dir: &Path) -> Router {
    build_router(state, Some(static_dir))
}

fn build_router(state: AppState, static_dir: Option<&Path>) -> Router {
    let mut router = Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Speech-to-text
        .route("/stt/models", get(handlers::stt_models))
        .route("/stt/session", post(handlers::create_session))
        .route("/stt/session/:session_id", get(handlers::get_session))
        .route(
            "/transcribe_chunk",
            post(handlers::transcribe_chunk).layer(DefaultBodyLimit::max(MAX_CHUNK_BYTES)),
        )
        // Answers
        .route("/ollama/models", get(handlers::chat_models))
        .route("/answer", post(handlers::answer));

    if let Some(dir) = static_dir {
        router = router
            .route_service("/", ServeFile::new(dir.join("index.html")))
            .nest_service("/static", ServeDir::new(dir));
    }

    router
        // Browser frontend may be served from another origin
        .layer(CorsLayer::permissive())
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
