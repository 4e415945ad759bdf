use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub chat: ChatConfig,
    pub stt: SttConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
    /// Frontend directory served at `/` and `/static`
    #[serde(default)]
    pub static_dir: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

/// Chat-completion engine (Ollama) settings
#[derive(Debug, Clone, Deserialize)]
pub struct ChatConfig {
    pub base_url: String,
    pub default_model: String,
    pub timeout_secs: u64,
    pub discovery_timeout_secs: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SttBackendKind {
    /// OpenAI-compatible transcription server
    Remote,
    /// whisper.cpp in-process (requires the `whisper` feature)
    Whisper,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SttConfig {
    pub backend: SttBackendKind,
    pub base_url: String,
    pub timeout_secs: u64,
    pub models_dir: String,
    pub threads: u16,
}

impl Config {
    /// Load configuration: defaults, then the optional file at `path`, then
    /// `INTERVIEW_COPILOT__*` variables, then `OLLAMA_BASE_URL` / `OLLAMA_MODEL`.
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .set_default("service.name", "phone-interview-ai")?
            .set_default("service.http.bind", "0.0.0.0")?
            .set_default("service.http.port", 8000)?
            .set_default("chat.base_url", "http://127.0.0.1:11434")?
            .set_default("chat.default_model", "llama3:latest")?
            .set_default("chat.timeout_secs", 120)?
            .set_default("chat.discovery_timeout_secs", 5)?
            .set_default("stt.backend", "remote")?
            .set_default("stt.base_url", "http://127.0.0.1:8001")?
            .set_default("stt.timeout_secs", 120)?
            .set_default("stt.models_dir", "~/.cache/whisper")?
            .set_default("stt.threads", 4)?
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("INTERVIEW_COPILOT")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()
            .with_context(|| format!("Failed to build config from {}", path))?;

        let mut cfg: Config = settings
            .try_deserialize()
            .context("Failed to deserialize config")?;
        cfg.apply_env_overrides(|key| std::env::var(key).ok());
        cfg.normalize();

        Ok(cfg)
    }

    /// Apply the conventional Ollama variables on top of everything else.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("OLLAMA_BASE_URL").filter(|v| !v.trim().is_empty()) {
            self.chat.base_url = url;
        }
        if let Some(model) = lookup("OLLAMA_MODEL").filter(|v| !v.trim().is_empty()) {
            self.chat.default_model = model;
        }
    }

    fn normalize(&mut self) {
        self.chat.base_url = self.chat.base_url.trim().trim_end_matches('/').to_string();
        self.stt.base_url = self.stt.base_url.trim().trim_end_matches('/').to_string();
    }

    pub fn static_dir(&self) -> Option<PathBuf> {
        self.service
            .static_dir
            .as_deref()
            .filter(|dir| !dir.trim().is_empty())
            .map(expand_path)
    }

    pub fn models_dir(&self) -> PathBuf {
        expand_path(&self.stt.models_dir)
    }
}

fn expand_path(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).into_owned())
}
