use super::error::AudioGenerationError;
use super::language::{build_detector, detect_language, LanguageCode};
use super::AudioFormat;
use crate::domain::content::split_sentences;
use crate::infrastructure::audio::AudioConcatenator;
use crate::infrastructure::repositories::TtsRepository;
use lingua::LanguageDetector;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone)]
pub struct SynthesizedAudio {
    pub bytes: Vec<u8>,
    pub format: AudioFormat,
    /// Name of the backend that produced the audio
    pub backend: &'static str,
    pub chunk_count: usize,
    pub language: LanguageCode,
    /// Parts were joined byte for byte, players may stop after the first one
    pub degraded: bool,
    /// False when the audio is a placeholder rather than spoken words
    pub is_speech: bool,
    /// Backends earlier in the chain that failed before this one succeeded
    pub fallback_from: Vec<&'static str>,
}

/// Turns a script into one audio file by walking an ordered chain of TTS
/// backends until one of them synthesizes every chunk.
pub struct AudioGenerator {
    backends: Vec<Arc<dyn TtsRepository>>,
    concatenator: AudioConcatenator,
    retry_delay: Duration,
    language_detector: LanguageDetector,
}

impl AudioGenerator {
    pub fn new(
        backends: Vec<Arc<dyn TtsRepository>>,
        concatenator: AudioConcatenator,
        retry_delay: Duration,
    ) -> Self {
        Self {
            backends,
            concatenator,
            retry_delay,
            language_detector: build_detector(),
        }
    }

    pub fn backend_names(&self) -> Vec<&'static str> {
        self.backends.iter().map(|backend| backend.name()).collect()
    }

    pub async fn synthesize(&self, text: &str) -> Result<SynthesizedAudio, AudioGenerationError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AudioGenerationError::EmptyScript);
        }
        if self.backends.is_empty() {
            tracing::warn!("Audio requested but no TTS backend is configured");
            return Err(AudioGenerationError::NoBackendConfigured);
        }

        let language = detect_language(&self.language_detector, text);
        tracing::info!(
            text_length = text.len(),
            language = %language,
            backends = ?self.backend_names(),
            "Starting audio synthesis"
        );

        let mut failures = Vec::new();
        let mut failed_backends = Vec::new();
        for backend in &self.backends {
            match self.synthesize_with(backend.as_ref(), text, language).await {
                Ok(mut audio) => {
                    audio.fallback_from = failed_backends;
                    return Ok(audio);
                }
                Err(e) => {
                    tracing::warn!(
                        backend = backend.name(),
                        error = %e,
                        "TTS backend failed, trying next one"
                    );
                    failures.push(format!("{}: {}", backend.name(), e));
                    failed_backends.push(backend.name());
                }
            }
        }

        tracing::error!(failures = ?failures, "Every TTS backend failed");
        Err(AudioGenerationError::AllBackendsFailed(failures))
    }

    async fn synthesize_with(
        &self,
        backend: &dyn TtsRepository,
        text: &str,
        language: LanguageCode,
    ) -> Result<SynthesizedAudio, String> {
        let chunks: Vec<String> = match backend.max_chunk_size() {
            Some(max) => split_sentences(text, max)
                .into_iter()
                .map(|chunk| chunk.trim().to_string())
                .filter(|chunk| !chunk.is_empty())
                .collect(),
            None => vec![text.to_string()],
        };

        tracing::debug!(
            backend = backend.name(),
            chunk_count = chunks.len(),
            "Script split for TTS backend"
        );

        let mut parts = Vec::with_capacity(chunks.len());
        for (index, chunk) in chunks.iter().enumerate() {
            let bytes = self
                .synthesize_chunk(backend, chunk, language)
                .await
                .map_err(|e| format!("chunk {} of {}: {}", index + 1, chunks.len(), e))?;
            parts.push(bytes);
        }

        let format = backend.audio_format();
        let chunk_count = parts.len();
        let combined = self.concatenator.concat(parts, format).await;
        let degraded = combined.is_degraded();

        tracing::info!(
            backend = backend.name(),
            chunk_count = chunk_count,
            audio_size = combined.bytes.len(),
            format = format.extension(),
            degraded = degraded,
            "Audio synthesized"
        );

        Ok(SynthesizedAudio {
            bytes: combined.bytes,
            format,
            backend: backend.name(),
            chunk_count,
            language,
            degraded,
            is_speech: backend.is_speech(),
            fallback_from: Vec::new(),
        })
    }

    async fn synthesize_chunk(
        &self,
        backend: &dyn TtsRepository,
        chunk: &str,
        language: LanguageCode,
    ) -> Result<Vec<u8>, String> {
        match backend.synthesize_chunk(chunk, language).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if backend.retry_on_failure() => {
                tracing::warn!(
                    backend = backend.name(),
                    error = %e,
                    retry_delay_ms = self.retry_delay.as_millis() as u64,
                    "TTS chunk failed, retrying once"
                );
                tokio::time::sleep(self.retry_delay).await;
                backend.synthesize_chunk(chunk, language).await
            }
            Err(e) => Err(e),
        }
    }
}
