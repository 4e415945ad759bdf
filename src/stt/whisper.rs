use super::{DecodeOptions, EngineLoader, Segment, SpeechEngine, SttModel};
use crate::audio::{decode_to_mono_16k, vad, AudioContainer};
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

/// whisper.cpp model loaded in-process
pub struct LocalWhisper {
    context: Arc<WhisperContext>,
    threads: u16,
}

impl LocalWhisper {
    fn run(context: &WhisperContext, threads: u16, samples: &[f32], options: &DecodeOptions) -> Result<Vec<Segment>> {
        let mut state = context
            .create_state()
            .map_err(|e| anyhow!("Failed to create whisper state: {}", e))?;

        // beam_size 1 is plain greedy decoding
        let mut params = FullParams::new(SamplingStrategy::Greedy {
            best_of: options.best_of as i32,
        });
        params.set_n_threads(threads as i32);
        params.set_language(options.language.as_deref());
        params.set_temperature(options.temperature);
        params.set_print_special(false);
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_print_timestamps(false);

        state
            .full(params, samples)
            .map_err(|e| anyhow!("Whisper decode failed: {}", e))?;

        let mut segments = Vec::new();
        for idx in 0..state.full_n_segments() {
            let Some(segment) = state.get_segment(idx) else {
                continue;
            };
            let text = segment
                .to_str_lossy()
                .map(|cow| cow.to_string())
                .unwrap_or_default();
            segments.push(Segment::new(text));
        }

        Ok(segments)
    }
}

#[async_trait]
impl SpeechEngine for LocalWhisper {
    async fn transcribe(
        &self,
        path: &Path,
        container: AudioContainer,
        options: &DecodeOptions,
    ) -> Result<Vec<Segment>> {
        let path = path.to_path_buf();
        let options = options.clone();
        let context = Arc::clone(&self.context);
        let threads = self.threads;

        tokio::task::spawn_blocking(move || {
            let audio = decode_to_mono_16k(&path, container)?;
            let samples = if options.vad_filter {
                vad::filter_speech(&audio.samples)?
            } else {
                audio.samples
            };

            debug!(
                "Decoding {:.1}s of audio from {}",
                samples.len() as f64 / audio.sample_rate as f64,
                path.display()
            );

            if samples.is_empty() {
                return Ok(Vec::new());
            }
            Self::run(&context, threads, &samples, &options)
        })
        .await
        .context("Whisper task panicked")?
    }
}

/// Loads `ggml-<model>.bin` files from a models directory
pub struct LocalWhisperLoader {
    models_dir: PathBuf,
    threads: u16,
}

impl LocalWhisperLoader {
    pub fn new(models_dir: PathBuf, threads: u16) -> Self {
        Self { models_dir, threads }
    }

    pub fn model_path(&self, model: SttModel) -> PathBuf {
        self.models_dir.join(format!("ggml-{}.bin", model.as_str()))
    }
}

#[async_trait]
impl EngineLoader for LocalWhisperLoader {
    async fn load(&self, model: SttModel) -> Result<Arc<dyn SpeechEngine>> {
        let path = self.model_path(model);
        if !path.exists() {
            anyhow::bail!("Model file not found: {}", path.display());
        }
        info!("Loading whisper model from {}", path.display());

        let context = tokio::task::spawn_blocking(move || {
            let path_str = path
                .to_str()
                .ok_or_else(|| anyhow!("Invalid model path: {}", path.display()))?;
            WhisperContext::new_with_params(path_str, WhisperContextParameters::default())
                .map_err(|e| anyhow!("Failed to load model: {}", e))
        })
        .await
        .context("Model loading task panicked")??;

        Ok(Arc::new(LocalWhisper {
            context: Arc::new(context),
            threads: self.threads,
        }))
    }
}
