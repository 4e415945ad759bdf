use super::{DecodeOptions, EngineLoader, Segment, SpeechEngine, SttModel};
use crate::audio::AudioContainer;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// `verbose_json` transcription response
#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    #[serde(default)]
    text: String,
    #[serde(default)]
    segments: Option<Vec<Segment>>,
}

/// Client for an OpenAI-compatible transcription server
/// (`POST /v1/audio/transcriptions`), e.g. faster-whisper-server.
pub struct RemoteWhisper {
    client: reqwest::Client,
    endpoint: String,
    model: SttModel,
}

impl RemoteWhisper {
    pub fn new(client: reqwest::Client, base_url: &str, model: SttModel) -> Self {
        Self {
            client,
            endpoint: format!("{}/v1/audio/transcriptions", base_url.trim_end_matches('/')),
            model,
        }
    }

    fn form(&self, bytes: Vec<u8>, container: AudioContainer, options: &DecodeOptions) -> Result<Form> {
        let file = Part::bytes(bytes)
            .file_name(format!("chunk{}", container.suffix()))
            .mime_str(container.mime_type())
            .context("Invalid audio mime type")?;

        let mut form = Form::new()
            .part("file", file)
            .text("model", self.model.as_str())
            .text("response_format", "verbose_json")
            .text("temperature", options.temperature.to_string())
            .text("beam_size", options.beam_size.to_string())
            .text("best_of", options.best_of.to_string())
            .text("vad_filter", options.vad_filter.to_string());

        if let Some(language) = &options.language {
            form = form.text("language", language.clone());
        }

        Ok(form)
    }
}

#[async_trait]
impl SpeechEngine for RemoteWhisper {
    async fn transcribe(
        &self,
        path: &Path,
        container: AudioContainer,
        options: &DecodeOptions,
    ) -> Result<Vec<Segment>> {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        debug!(
            "Sending {} bytes to {} (model={})",
            bytes.len(),
            self.endpoint,
            self.model
        );

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(self.form(bytes, container, options)?)
            .send()
            .await
            .context("Failed to reach STT server")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("STT server returned {}: {}", status, body);
            anyhow::bail!("STT server returned {}: {}", status, body.trim());
        }

        let parsed: TranscriptionResponse = response
            .json()
            .await
            .context("Failed to parse STT response")?;

        Ok(match parsed.segments {
            Some(segments) if !segments.is_empty() => segments,
            _ => vec![Segment::new(parsed.text)],
        })
    }
}

/// Hands out `RemoteWhisper` clients sharing one connection pool
pub struct RemoteWhisperLoader {
    client: reqwest::Client,
    base_url: String,
}

impl RemoteWhisperLoader {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build STT HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl EngineLoader for RemoteWhisperLoader {
    async fn load(&self, model: SttModel) -> Result<Arc<dyn SpeechEngine>> {
        Ok(Arc::new(RemoteWhisper::new(
            self.client.clone(),
            &self.base_url,
            model,
        )))
    }
}
