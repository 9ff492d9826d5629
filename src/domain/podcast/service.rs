use super::error::PodcastServiceError;
use crate::domain::audio::{AudioGenerator, SynthesizedAudio};
use crate::domain::content::{ContentCategory, LengthTier, RawContent, SourceType};
use crate::domain::script::ScriptGenerator;
use crate::infrastructure::storage::{MediaStore, StoredAudio};
use async_trait::async_trait;
use std::sync::Arc;

/// Extracted text shorter than this is rejected before any generation
pub const DEFAULT_MIN_CONTENT_LENGTH: usize = 100;

const DEGRADED_AUDIO_WARNING: &str =
    "Audio parts were joined without re-encoding; some players may stop after the first part";
const PLACEHOLDER_AUDIO_WARNING: &str =
    "No speech backend succeeded; the audio is a placeholder tone, not spoken words";

#[derive(Debug, Clone)]
pub struct PodcastResult {
    pub script: String,
    pub source_type: SourceType,
    pub content_length: usize,
    pub category: ContentCategory,
    pub tier: LengthTier,
    pub audio: Option<StoredAudio>,
    pub audio_error: Option<String>,
    pub audio_warning: Option<String>,
}

/// What the pipeline is wired to, for the readiness probe
#[derive(Debug, Clone)]
pub struct Readiness {
    pub generation_backend: Option<(&'static str, String)>,
    pub tts_chain: Vec<&'static str>,
}

/// The whole content-to-podcast pipeline. Built once at startup and shared.
pub struct PodcastService {
    script_generator: Arc<ScriptGenerator>,
    audio_generator: Arc<AudioGenerator>,
    store: Arc<MediaStore>,
    min_content_length: usize,
}

impl PodcastService {
    pub fn new(
        script_generator: Arc<ScriptGenerator>,
        audio_generator: Arc<AudioGenerator>,
        store: Arc<MediaStore>,
        min_content_length: usize,
    ) -> Self {
        Self {
            script_generator,
            audio_generator,
            store,
            min_content_length,
        }
    }

    pub fn min_content_length(&self) -> usize {
        self.min_content_length
    }
}

#[async_trait]
pub trait PodcastServiceApi: Send + Sync {
    /// Turn extracted content into a script and, when possible, audio
    ///
    /// This operation:
    /// - Rejects content below the minimum length
    /// - Generates the script (fatal on failure)
    /// - Saves the script and synthesizes audio (non-fatal, reported as warnings)
    async fn generate_podcast(&self, content: RawContent) -> Result<PodcastResult, PodcastServiceError>;

    /// One tiny generation call to check the backend answers
    async fn test_generation(&self) -> Result<String, PodcastServiceError>;

    fn readiness(&self) -> Readiness;
}

#[async_trait]
impl PodcastServiceApi for PodcastService {
    async fn generate_podcast(&self, content: RawContent) -> Result<PodcastResult, PodcastServiceError> {
        let content_length = content.text.trim().chars().count();
        tracing::info!(
            source_type = %content.source_type,
            content_length = content_length,
            "Podcast generation request"
        );

        if content_length < self.min_content_length {
            return Err(PodcastServiceError::Invalid(format!(
                "Could not extract sufficient content (got {} characters, need at least {})",
                content_length, self.min_content_length
            )));
        }

        // 1. Script (fatal)
        let generated = self.script_generator.generate(&content.text).await?;
        if !generated.dropped_chunks.is_empty() {
            tracing::warn!(
                dropped_chunks = ?generated.dropped_chunks,
                chunk_count = generated.chunk_count,
                "Script generated with missing chunks"
            );
        }

        // 2. Keep a copy of the script next to the uploads
        if let Err(e) = self.store.save_script(&generated.script).await {
            tracing::warn!(error = %e, "Failed to save script file");
        }

        // 3. Audio (non-fatal)
        let (audio, audio_error, audio_warning) = self.produce_audio(&generated.script).await;

        tracing::info!(
            content_type = %generated.category,
            length_tier = %generated.tier,
            script_length = generated.script.len(),
            has_audio = audio.is_some(),
            "Podcast generation finished"
        );

        Ok(PodcastResult {
            script: generated.script,
            source_type: content.source_type,
            content_length,
            category: generated.category,
            tier: generated.tier,
            audio,
            audio_error,
            audio_warning,
        })
    }

    async fn test_generation(&self) -> Result<String, PodcastServiceError> {
        Ok(self.script_generator.smoke_test().await?)
    }

    fn readiness(&self) -> Readiness {
        Readiness {
            generation_backend: self.script_generator.backend_info(),
            tts_chain: self.audio_generator.backend_names(),
        }
    }
}

impl PodcastService {
    /// Audio plus error and warning strings for the response
    async fn produce_audio(
        &self,
        script: &str,
    ) -> (Option<StoredAudio>, Option<String>, Option<String>) {
        let synthesized = match self.audio_generator.synthesize(script).await {
            Ok(synthesized) => synthesized,
            Err(e) => {
                tracing::warn!(error = %e, "Audio generation failed, returning script only");
                return (None, Some(format!("Audio generation failed: {}", e)), None);
            }
        };

        let warning = audio_warning(&synthesized);

        match self
            .store
            .save_audio(&synthesized.bytes, synthesized.format)
            .await
        {
            Ok(stored) => (Some(stored), None, warning),
            Err(e) => {
                tracing::error!(error = %e, "Failed to save audio file");
                (None, Some(format!("Failed to save audio: {}", e)), warning)
            }
        }
    }
}

/// Every way the audio falls short of the primary backend's speech, joined
fn audio_warning(audio: &SynthesizedAudio) -> Option<String> {
    let mut warnings = Vec::new();
    if !audio.is_speech {
        warnings.push(PLACEHOLDER_AUDIO_WARNING.to_string());
    } else if !audio.fallback_from.is_empty() {
        warnings.push(format!(
            "Primary speech backend failed ({}); audio was produced by the '{}' fallback",
            audio.fallback_from.join(", "),
            audio.backend
        ));
    }
    if audio.degraded {
        warnings.push(DEGRADED_AUDIO_WARNING.to_string());
    }

    (!warnings.is_empty()).then(|| warnings.join("; "))
}
