// Shared test doubles for the integration tests
#![allow(dead_code)]

use anyhow::Result;
use async_trait::async_trait;
use interview_copilot::chat::{ChatEngine, ChatError, ChatMessage, ChatRequest, ChatResponse};
use interview_copilot::{AudioContainer, DecodeOptions, EngineLoader, Segment, SpeechEngine, SttModel};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// What the stub engine saw on one call
#[derive(Debug, Clone)]
pub struct SeenCall {
    pub path: PathBuf,
    pub existed: bool,
    pub bytes: Vec<u8>,
    pub container: AudioContainer,
    pub options: DecodeOptions,
}

/// Speech engine returning scripted segments, one script entry per call
#[derive(Default)]
pub struct ScriptedEngine {
    pub script: Mutex<VecDeque<Result<Vec<&'static str>, &'static str>>>,
    pub calls: Mutex<Vec<SeenCall>>,
}

impl ScriptedEngine {
    pub fn with_script(script: Vec<Result<Vec<&'static str>, &'static str>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl SpeechEngine for ScriptedEngine {
    async fn transcribe(
        &self,
        path: &Path,
        container: AudioContainer,
        options: &DecodeOptions,
    ) -> Result<Vec<Segment>> {
        self.calls.lock().unwrap().push(SeenCall {
            path: path.to_path_buf(),
            existed: path.exists(),
            bytes: std::fs::read(path).unwrap_or_default(),
            container,
            options: options.clone(),
        });

        let next = self.script.lock().unwrap().pop_front().unwrap_or(Ok(Vec::new()));
        match next {
            Ok(texts) => Ok(texts.into_iter().map(Segment::new).collect()),
            Err(msg) => anyhow::bail!("{}", msg),
        }
    }
}

/// Loader handing out one shared engine and recording requested models
pub struct SharedLoader {
    pub engine: Arc<ScriptedEngine>,
    pub requested: Mutex<Vec<SttModel>>,
}

impl SharedLoader {
    pub fn new(engine: Arc<ScriptedEngine>) -> Arc<Self> {
        Arc::new(Self {
            engine,
            requested: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl EngineLoader for SharedLoader {
    async fn load(&self, model: SttModel) -> Result<Arc<dyn SpeechEngine>> {
        self.requested.lock().unwrap().push(model);
        Ok(self.engine.clone())
    }
}

/// Speech engine keyed on the uploaded bytes: each payload maps to a decode
/// delay and the text it transcribes to
pub struct PayloadEngine {
    pub replies: Vec<(&'static [u8], Duration, &'static str)>,
}

#[async_trait]
impl SpeechEngine for PayloadEngine {
    async fn transcribe(
        &self,
        path: &Path,
        _container: AudioContainer,
        _options: &DecodeOptions,
    ) -> Result<Vec<Segment>> {
        let bytes = std::fs::read(path)?;
        let Some((_, delay, text)) = self.replies.iter().find(|(payload, _, _)| *payload == bytes.as_slice()) else {
            anyhow::bail!("unexpected payload");
        };
        tokio::time::sleep(*delay).await;
        Ok(vec![Segment::new(*text)])
    }
}

pub struct PayloadLoader(pub Arc<PayloadEngine>);

#[async_trait]
impl EngineLoader for PayloadLoader {
    async fn load(&self, _model: SttModel) -> Result<Arc<dyn SpeechEngine>> {
        Ok(self.0.clone())
    }
}

/// Chat engine double that counts calls and keeps the last request
pub struct CountingChat {
    pub reply: String,
    pub calls: AtomicUsize,
    pub last: Mutex<Option<ChatRequest>>,
}

impl CountingChat {
    pub fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.to_string(),
            calls: AtomicUsize::new(0),
            last: Mutex::new(None),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_system_prompt(&self) -> String {
        self.last
            .lock()
            .unwrap()
            .as_ref()
            .map(|req| req.messages[0].content.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ChatEngine for CountingChat {
    fn base_url(&self) -> &str {
        "http://ollama.test"
    }

    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, ChatError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last.lock().unwrap() = Some(request.clone());
        Ok(ChatResponse {
            message: Some(ChatMessage {
                role: "assistant".to_string(),
                content: self.reply.clone(),
            }),
        })
    }

    async fn list_models(&self) -> Result<Vec<String>, ChatError> {
        Ok(vec!["llama3:latest".to_string(), "mistral:7b".to_string()])
    }
}

pub const BOUNDARY: &str = "----copilot-test-boundary";

/// Build a multipart/form-data body by hand
pub fn multipart_body(fields: &[(&str, &str)], audio: Option<(&str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, name, value
            )
            .as_bytes(),
        );
    }
    if let Some((filename, bytes)) = audio {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"audio\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
                BOUNDARY, filename
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

/// 16-bit PCM WAV file with a sine tone
pub fn write_sine_wav(path: &Path, sample_rate: u32, channels: u16, seconds: f32) -> Result<()> {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec)?;
    let frames = (sample_rate as f32 * seconds) as usize;
    for i in 0..frames {
        let t = i as f32 / sample_rate as f32;
        let sample = ((t * 440.0 * 2.0 * std::f32::consts::PI).sin() * 0.5 * i16::MAX as f32) as i16;
        for _ in 0..channels {
            writer.write_sample(sample)?;
        }
    }
    writer.finalize()?;
    Ok(())
}
