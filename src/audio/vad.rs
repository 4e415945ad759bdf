//! Voice-activity filtering ahead of decoding.
//!
//! Audio is scored in fixed windows; windows below the speech threshold are
//! dropped, except for a little padding either side of speech so word edges
//! survive.

/// Silero window at 16 kHz (32 ms)
pub const VAD_CHUNK_SIZE_16KHZ: usize = 512;

/// Speech probability at or above which a window is kept
pub const VAD_SPEECH_THRESHOLD: f32 = 0.5;

/// Windows kept on each side of detected speech (~200 ms)
pub const VAD_PAD_WINDOWS: usize = 6;

/// Keep the windows of `samples` whose score (or a neighbour's, within
/// `pad` windows) reaches `threshold`. `scores[i]` belongs to window `i`.
pub fn keep_speech(samples: &[f32], scores: &[f32], window: usize, threshold: f32, pad: usize) -> Vec<f32> {
    if window == 0 || samples.is_empty() {
        return Vec::new();
    }

    let windows = samples.len().div_ceil(window);
    let mut keep = vec![false; windows];
    for (idx, score) in scores.iter().enumerate().take(windows) {
        if *score >= threshold {
            let start = idx.saturating_sub(pad);
            let end = (idx + pad).min(windows - 1);
            keep[start..=end].iter_mut().for_each(|k| *k = true);
        }
    }

    samples
        .chunks(window)
        .zip(keep)
        .filter(|(_, keep)| *keep)
        .flat_map(|(chunk, _)| chunk.iter().copied())
        .collect()
}

#[cfg(feature = "whisper")]
mod silero {
    use super::*;
    use anyhow::{anyhow, Result};
    use voice_activity_detector::VoiceActivityDetector;

    /// Drop non-speech from 16 kHz mono audio using Silero VAD
    pub fn filter_speech(samples: &[f32]) -> Result<Vec<f32>> {
        let mut vad = VoiceActivityDetector::builder()
            .sample_rate(16000)
            .chunk_size(VAD_CHUNK_SIZE_16KHZ)
            .build()
            .map_err(|e| anyhow!("VAD initialization failed: {}", e))?;

        let scores: Vec<f32> = samples
            .chunks(VAD_CHUNK_SIZE_16KHZ)
            .map(|chunk| {
                let mut window = chunk.to_vec();
                window.resize(VAD_CHUNK_SIZE_16KHZ, 0.0);
                vad.predict(window)
            })
            .collect();

        Ok(keep_speech(
            samples,
            &scores,
            VAD_CHUNK_SIZE_16KHZ,
            VAD_SPEECH_THRESHOLD,
            VAD_PAD_WINDOWS,
        ))
    }
}

#[cfg(feature = "whisper")]
pub use silero::filter_speech;
