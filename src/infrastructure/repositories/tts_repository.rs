use crate::domain::audio::{AudioFormat, LanguageCode};
use async_trait::async_trait;

/// Repository for TTS synthesis operations.
/// Abstracts the underlying TTS provider (OpenAI, AWS Polly, OS speech engine, tone fallback)
///
/// Implementations describe their own request-size ceiling; the audio
/// generator splits the script to fit it and merges the returned chunks.
#[async_trait]
pub trait TtsRepository: Send + Sync {
    /// Provider name, used in logs, health output and the response
    fn name(&self) -> &'static str;

    /// Maximum characters per synthesis call, `None` when unbounded
    fn max_chunk_size(&self) -> Option<usize>;

    /// Container format of the returned audio
    fn audio_format(&self) -> AudioFormat;

    /// Whether a failed call is worth one retry (network-backed providers)
    fn retry_on_failure(&self) -> bool {
        false
    }

    /// False for backends that only stand in for speech (the tone generator)
    fn is_speech(&self) -> bool {
        true
    }

    /// Synthesize one chunk of text
    ///
    /// # Arguments
    /// * `text` - Chunk no longer than `max_chunk_size`, except a single over-long sentence
    /// * `language` - Detected language of the whole script, for voice selection
    ///
    /// # Errors
    /// Returns error if synthesis fails or provider is unavailable
    async fn synthesize_chunk(&self, text: &str, language: LanguageCode) -> Result<Vec<u8>, String>;
}
