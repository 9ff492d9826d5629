use crate::domain::audio::AudioFormat;
use chrono::Utc;
use std::path::PathBuf;
use uuid::Uuid;

/// URL prefix the audio folder is served under
pub const AUDIO_URL_PREFIX: &str = "/static/audio";

#[derive(Debug, Clone, PartialEq)]
pub struct StoredAudio {
    pub filename: String,
    pub path: PathBuf,
    pub url: String,
}

/// Writes generated scripts and audio to disk
#[derive(Debug, Clone)]
pub struct MediaStore {
    script_dir: PathBuf,
    audio_dir: PathBuf,
}

impl MediaStore {
    pub fn new(script_dir: impl Into<PathBuf>, audio_dir: impl Into<PathBuf>) -> Self {
        Self {
            script_dir: script_dir.into(),
            audio_dir: audio_dir.into(),
        }
    }

    /// Create both folders if missing
    pub async fn ensure_dirs(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.script_dir).await?;
        tokio::fs::create_dir_all(&self.audio_dir).await
    }

    pub async fn save_script(&self, script: &str) -> std::io::Result<PathBuf> {
        let path = self.script_dir.join(format!("{}.txt", Uuid::new_v4()));
        tokio::fs::write(&path, script).await?;
        tracing::debug!(path = %path.display(), script_length = script.len(), "Script saved");
        Ok(path)
    }

    pub async fn save_audio(&self, bytes: &[u8], format: AudioFormat) -> std::io::Result<StoredAudio> {
        let filename = audio_filename(format);
        let path = self.audio_dir.join(&filename);
        tokio::fs::write(&path, bytes).await?;

        tracing::info!(
            path = %path.display(),
            audio_size = bytes.len(),
            "Audio file saved"
        );

        Ok(StoredAudio {
            url: format!("{}/{}", AUDIO_URL_PREFIX, filename),
            filename,
            path,
        })
    }
}

/// `podcast_<YYYYmmdd_HHMMSS>_<8 hex chars>.<ext>`
fn audio_filename(format: AudioFormat) -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!(
        "podcast_{}_{}.{}",
        Utc::now().format("%Y%m%d_%H%M%S"),
        &id[..8],
        format.extension()
    )
}
