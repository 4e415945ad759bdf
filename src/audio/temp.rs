use super::container::AudioContainer;
use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// An uploaded chunk persisted to a uniquely named temporary file.
///
/// The file is removed when the guard is dropped, whether transcription
/// succeeded or not. Removal failures are logged and otherwise ignored.
pub struct TempAudio {
    path: PathBuf,
    container: AudioContainer,
}

impl TempAudio {
    /// Write `bytes` to a new temp file in the system temp directory
    pub fn persist(bytes: &[u8], container: AudioContainer) -> Result<Self> {
        Self::persist_in(std::env::temp_dir(), bytes, container)
    }

    /// Write `bytes` to a new temp file inside `dir`
    pub fn persist_in(dir: impl AsRef<Path>, bytes: &[u8], container: AudioContainer) -> Result<Self> {
        let suffix = container.suffix();
        let mut file = tempfile::Builder::new()
            .prefix("chunk-")
            .suffix(&suffix)
            .tempfile_in(dir)
            .context("Failed to create temporary audio file")?;

        file.write_all(bytes)
            .context("Failed to write temporary audio file")?;
        file.flush().context("Failed to flush temporary audio file")?;

        // removal is ours (see Drop), not tempfile's
        let (_, path) = file
            .keep()
            .context("Failed to persist temporary audio file")?;

        debug!("Persisted {} bytes to {}", bytes.len(), path.display());

        Ok(Self { path, container })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn container(&self) -> AudioContainer {
        self.container
    }
}

impl Drop for TempAudio {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            warn!("Failed to remove {}: {}", self.path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persist_writes_bytes_with_suffix() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let audio = TempAudio::persist_in(dir.path(), b"RIFF....", AudioContainer::Wav)?;

        assert!(audio.path().exists());
        assert!(audio.path().to_string_lossy().ends_with(".wav"));
        assert_eq!(std::fs::read(audio.path())?, b"RIFF....");
        Ok(())
    }

    #[test]
    fn test_drop_removes_file() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = {
            let audio = TempAudio::persist_in(dir.path(), b"data", AudioContainer::Webm)?;
            audio.path().to_path_buf()
        };
        assert!(!path.exists());
        Ok(())
    }

    #[test]
    fn test_drop_swallows_missing_file() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let audio = TempAudio::persist_in(dir.path(), b"data", AudioContainer::Ogg)?;
        std::fs::remove_file(audio.path())?;
        drop(audio);
        Ok(())
    }

    #[test]
    fn test_unique_names() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let a = TempAudio::persist_in(dir.path(), b"a", AudioContainer::Mp3)?;
        let b = TempAudio::persist_in(dir.path(), b"b", AudioContainer::Mp3)?;
        assert_ne!(a.path(), b.path());
        Ok(())
    }
}
