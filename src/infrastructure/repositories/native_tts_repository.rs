//! Speech through the operating system's own synthesizer.
//!
//! `espeak-ng` on Linux, `say` on macOS. Both write a WAV file; the text is
//! handed over in a file so it never goes through the shell.

use super::tts_repository::TtsRepository;
use crate::domain::audio::{AudioFormat, LanguageCode};
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// OS engines misbehave on long input, keep calls short
const MAX_CHUNK_SIZE: usize = 800;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeEngine {
    EspeakNg,
    Say,
}

impl NativeEngine {
    fn program(&self) -> &'static str {
        match self {
            NativeEngine::EspeakNg => "espeak-ng",
            NativeEngine::Say => "say",
        }
    }

    fn args(&self, input: &Path, output: &Path, language: LanguageCode) -> Vec<String> {
        let input = input.to_string_lossy().to_string();
        let output = output.to_string_lossy().to_string();
        match self {
            NativeEngine::EspeakNg => vec![
                "-v".to_string(),
                language.as_str().to_string(),
                "-w".to_string(),
                output,
                "-f".to_string(),
                input,
            ],
            NativeEngine::Say => vec![
                "-o".to_string(),
                output,
                "--file-format=WAVE".to_string(),
                "--data-format=LEI16@22050".to_string(),
                "-f".to_string(),
                input,
            ],
        }
    }
}

pub struct NativeTtsRepository {
    engine: NativeEngine,
    executable: PathBuf,
}

impl NativeTtsRepository {
    pub fn new(engine: NativeEngine, executable: PathBuf) -> Self {
        Self { engine, executable }
    }

    /// Find an installed engine on `PATH`
    pub fn detect() -> Option<Self> {
        Self::detect_in(std::env::var_os("PATH"))
    }

    /// Find an installed engine in the given search path
    pub fn detect_in(paths: Option<OsString>) -> Option<Self> {
        let paths = paths?;
        let cwd = std::env::current_dir().unwrap_or_default();
        let candidates: &[NativeEngine] = if cfg!(target_os = "macos") {
            &[NativeEngine::Say, NativeEngine::EspeakNg]
        } else {
            &[NativeEngine::EspeakNg]
        };

        candidates.iter().find_map(|engine| {
            let executable = which::which_in(engine.program(), Some(&paths), &cwd).ok()?;
            tracing::info!(
                engine = engine.program(),
                executable = %executable.display(),
                "Native speech engine found"
            );
            Some(Self::new(*engine, executable))
        })
    }
}

#[async_trait]
impl TtsRepository for NativeTtsRepository {
    fn name(&self) -> &'static str {
        "native"
    }

    fn max_chunk_size(&self) -> Option<usize> {
        Some(MAX_CHUNK_SIZE)
    }

    fn audio_format(&self) -> AudioFormat {
        AudioFormat::Wav
    }

    async fn synthesize_chunk(&self, text: &str, language: LanguageCode) -> Result<Vec<u8>, String> {
        let workdir = tempfile::tempdir().map_err(|e| format!("Failed to create temp dir: {}", e))?;
        let input = workdir.path().join("input.txt");
        let output = workdir.path().join("output.wav");

        tokio::fs::write(&input, text)
            .await
            .map_err(|e| format!("Failed to write speech input: {}", e))?;

        tracing::debug!(
            engine = self.engine.program(),
            language = %language,
            text_length = text.len(),
            "Running native speech engine"
        );

        let result = Command::new(&self.executable)
            .args(self.engine.args(&input, &output, language))
            .output()
            .await
            .map_err(|e| format!("Failed to run {}: {}", self.engine.program(), e))?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            tracing::error!(
                engine = self.engine.program(),
                status = ?result.status.code(),
                stderr = %stderr,
                "Native speech engine failed"
            );
            return Err(format!(
                "{} exited with {}",
                self.engine.program(),
                result.status
            ));
        }

        tokio::fs::read(&output)
            .await
            .map_err(|e| format!("Failed to read native speech output: {}", e))
    }
}
