//! Speech-to-text engines
//!
//! The STT engine is an external capability. This module defines the call
//! contract (`SpeechEngine`), the allow-list of model names, a process-wide
//! cache of loaded engines, and the backends:
//! - `RemoteWhisper`: OpenAI-compatible transcription server over HTTP
//! - `LocalWhisper`: whisper.cpp in-process (`whisper` feature)

mod cache;
mod remote;
mod transcriber;
#[cfg(feature = "whisper")]
mod whisper;

pub use cache::EngineCache;
pub use remote::{RemoteWhisper, RemoteWhisperLoader};
pub use transcriber::{ChunkRequest, ChunkResponse, Transcriber};
#[cfg(feature = "whisper")]
pub use whisper::{LocalWhisper, LocalWhisperLoader};

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

use crate::audio::AudioContainer;

/// Whisper model sizes clients may ask for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SttModel {
    #[default]
    #[serde(rename = "base")]
    Base,
    #[serde(rename = "small")]
    Small,
    #[serde(rename = "medium")]
    Medium,
    #[serde(rename = "large-v3-turbo")]
    LargeV3Turbo,
    #[serde(rename = "large-v3")]
    LargeV3,
}

impl SttModel {
    pub const ALL: [SttModel; 5] = [
        SttModel::Base,
        SttModel::Small,
        SttModel::Medium,
        SttModel::LargeV3Turbo,
        SttModel::LargeV3,
    ];

    /// Resolve a requested model name; anything off the allow-list is `Base`
    pub fn from_name(name: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|model| model.as_str() == name.trim())
            .unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SttModel::Base => "base",
            SttModel::Small => "small",
            SttModel::Medium => "medium",
            SttModel::LargeV3Turbo => "large-v3-turbo",
            SttModel::LargeV3 => "large-v3",
        }
    }

    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|m| m.as_str()).collect()
    }
}

impl std::fmt::Display for SttModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decoding parameters for one transcription call
#[derive(Debug, Clone, PartialEq)]
pub struct DecodeOptions {
    /// Language code, `None` = auto-detect
    pub language: Option<String>,
    pub vad_filter: bool,
    pub temperature: f32,
    pub beam_size: u32,
    pub best_of: u32,
}

impl DecodeOptions {
    /// Deterministic greedy decoding with VAD, as used for live chunks
    pub fn greedy(language: Option<String>) -> Self {
        Self {
            language,
            vad_filter: true,
            temperature: 0.0,
            beam_size: 1,
            best_of: 1,
        }
    }
}

/// Normalize a language hint: empty or `auto` means auto-detect
pub fn language_hint(raw: &str) -> Option<String> {
    let normalized = raw.trim().to_ascii_lowercase();
    if normalized.is_empty() || normalized == "auto" {
        None
    } else {
        Some(normalized)
    }
}

/// One text segment returned by an engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    #[serde(default)]
    pub text: String,
}

impl Segment {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Trim every segment and join the non-empty ones with single spaces
pub fn join_segments(segments: &[Segment]) -> String {
    segments
        .iter()
        .map(|s| s.text.trim())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// A loaded speech-to-text model
#[async_trait]
pub trait SpeechEngine: Send + Sync {
    /// Transcribe the audio file at `path`
    async fn transcribe(
        &self,
        path: &Path,
        container: AudioContainer,
        options: &DecodeOptions,
    ) -> Result<Vec<Segment>>;
}

/// Loads engines for the cache; called at most once per model
#[async_trait]
pub trait EngineLoader: Send + Sync {
    async fn load(&self, model: SttModel) -> Result<Arc<dyn SpeechEngine>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_allow_list() {
        assert_eq!(SttModel::from_name("small"), SttModel::Small);
        assert_eq!(SttModel::from_name(" large-v3-turbo "), SttModel::LargeV3Turbo);
        assert_eq!(SttModel::names(), vec!["base", "small", "medium", "large-v3-turbo", "large-v3"]);
    }

    #[test]
    fn test_unknown_model_falls_back_to_base() {
        assert_eq!(SttModel::from_name("tiny"), SttModel::Base);
        assert_eq!(SttModel::from_name(""), SttModel::Base);
        assert_eq!(SttModel::from_name("LARGE-V3"), SttModel::Base);
    }

    #[test]
    fn test_language_hint() {
        assert_eq!(language_hint("en"), Some("en".to_string()));
        assert_eq!(language_hint(" FR "), Some("fr".to_string()));
        assert_eq!(language_hint(""), None);
        assert_eq!(language_hint("auto"), None);
    }

    #[test]
    fn test_greedy_options() {
        let opts = DecodeOptions::greedy(None);
        assert!(opts.vad_filter);
        assert_eq!(opts.temperature, 0.0);
        assert_eq!((opts.beam_size, opts.best_of), (1, 1));
    }

    #[test]
    fn test_join_segments() {
        let segments = vec![
            Segment::new("  Hello there. "),
            Segment::new("   "),
            Segment::new("How are you?"),
        ];
        assert_eq!(join_segments(&segments), "Hello there. How are you?");
        assert_eq!(join_segments(&[]), "");
    }
}
