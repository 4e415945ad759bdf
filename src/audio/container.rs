use serde::Serialize;

/// Container hint derived from an uploaded chunk's filename.
///
/// Only the extension matters; the bytes are never sniffed here. Browsers
/// record `audio/webm` by default, so anything unrecognised is treated as WebM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioContainer {
    Wav,
    Mp3,
    M4a,
    Ogg,
    Webm,
}

impl AudioContainer {
    pub fn from_filename(filename: &str) -> Self {
        let name = filename.trim().to_ascii_lowercase();
        if name.ends_with(".wav") {
            Self::Wav
        } else if name.ends_with(".mp3") {
            Self::Mp3
        } else if name.ends_with(".m4a") {
            Self::M4a
        } else if name.ends_with(".ogg") {
            Self::Ogg
        } else {
            Self::Webm
        }
    }

    /// Extension without the dot (symphonia probe hint)
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Wav => "wav",
            Self::Mp3 => "mp3",
            Self::M4a => "m4a",
            Self::Ogg => "ogg",
            Self::Webm => "webm",
        }
    }

    /// Temp-file suffix, dot included
    pub fn suffix(&self) -> String {
        format!(".{}", self.extension())
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Wav => "audio/wav",
            Self::Mp3 => "audio/mpeg",
            Self::M4a => "audio/mp4",
            Self::Ogg => "audio/ogg",
            Self::Webm => "audio/webm",
        }
    }
}
