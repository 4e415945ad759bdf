use crate::chat::{AnswerService, OllamaClient};
use crate::config::{Config, SttBackendKind};
use crate::http::AppState;
use crate::session::SessionStore;
use crate::stt::{EngineCache, EngineLoader, RemoteWhisperLoader, Transcriber};
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Wire the configured engines into fresh application state
pub fn build_state(cfg: &Config) -> Result<AppState> {
    let chat = OllamaClient::new(
        &cfg.chat.base_url,
        Duration::from_secs(cfg.chat.timeout_secs),
        Duration::from_secs(cfg.chat.discovery_timeout_secs),
    )?;
    info!("Chat engine: {} (default model {})", cfg.chat.base_url, cfg.chat.default_model);
    let answers = AnswerService::new(Arc::new(chat), cfg.chat.default_model.clone());

    let engines = EngineCache::new(stt_loader(cfg)?);
    let transcriber = Transcriber::new(SessionStore::new(), engines);

    Ok(AppState::new(cfg.service.name.clone(), transcriber, answers))
}

fn stt_loader(cfg: &Config) -> Result<Arc<dyn EngineLoader>> {
    match cfg.stt.backend {
        SttBackendKind::Remote => {
            info!("STT engine: remote server at {}", cfg.stt.base_url);
            Ok(Arc::new(RemoteWhisperLoader::new(
                &cfg.stt.base_url,
                Duration::from_secs(cfg.stt.timeout_secs),
            )?))
        }
        #[cfg(feature = "whisper")]
        SttBackendKind::Whisper => {
            let models_dir = cfg.models_dir();
            info!("STT engine: in-process whisper, models in {}", models_dir.display());
            Ok(Arc::new(crate::stt::LocalWhisperLoader::new(
                models_dir,
                cfg.stt.threads,
            )))
        }
        #[cfg(not(feature = "whisper"))]
        SttBackendKind::Whisper => {
            anyhow::bail!("stt.backend = \"whisper\" requires building with the `whisper` feature")
        }
    }
}
