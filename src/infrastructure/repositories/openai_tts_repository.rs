use super::tts_repository::TtsRepository;
use crate::domain::audio::{AudioFormat, LanguageCode};
use async_openai::{
    config::OpenAIConfig,
    types::{CreateSpeechRequest, SpeechModel, SpeechResponseFormat, Voice},
    Client,
};
use async_trait::async_trait;
use std::sync::Arc;

/// OpenAI has a limit of 4096 characters per request
const MAX_CHUNK_SIZE: usize = 4096;

/// OpenAI TTS implementation of TTS repository
pub struct OpenAiTtsRepository {
    client: Arc<Client<OpenAIConfig>>,
    model: String,
    default_voice: String,
}

impl OpenAiTtsRepository {
    pub fn new(client: Arc<Client<OpenAIConfig>>, model: String, default_voice: String) -> Self {
        Self {
            client,
            model,
            default_voice,
        }
    }

    /// Configured voice, or one suited to the language
    fn voice_for(&self, language: LanguageCode) -> Voice {
        let name = if self.default_voice.is_empty() {
            voice_for_language(language)
        } else {
            self.default_voice.as_str()
        };
        parse_voice(name)
    }

    fn speech_model(&self) -> SpeechModel {
        match self.model.as_str() {
            "tts-1" => SpeechModel::Tts1,
            "tts-1-hd" => SpeechModel::Tts1Hd,
            other => SpeechModel::Other(other.to_string()),
        }
    }
}

fn voice_for_language(language: LanguageCode) -> &'static str {
    match language {
        LanguageCode::English => "alloy",
        LanguageCode::Spanish => "echo",
        LanguageCode::French => "nova",
        LanguageCode::German => "onyx",
        LanguageCode::Italian => "fable",
        LanguageCode::Portuguese => "shimmer",
    }
}

fn parse_voice(name: &str) -> Voice {
    match name.to_lowercase().as_str() {
        "echo" => Voice::Echo,
        "fable" => Voice::Fable,
        "onyx" => Voice::Onyx,
        "nova" => Voice::Nova,
        "shimmer" => Voice::Shimmer,
        _ => Voice::Alloy,
    }
}

#[async_trait]
impl TtsRepository for OpenAiTtsRepository {
    fn name(&self) -> &'static str {
        "openai"
    }

    fn max_chunk_size(&self) -> Option<usize> {
        Some(MAX_CHUNK_SIZE)
    }

    fn audio_format(&self) -> AudioFormat {
        AudioFormat::Mp3
    }

    fn retry_on_failure(&self) -> bool {
        true
    }

    async fn synthesize_chunk(&self, text: &str, language: LanguageCode) -> Result<Vec<u8>, String> {
        let voice = self.voice_for(language);

        tracing::info!(
            model = %self.model,
            voice = ?voice,
            language = %language,
            text_length = text.len(),
            "Calling OpenAI TTS API"
        );

        let request = CreateSpeechRequest {
            model: self.speech_model(),
            input: text.to_string(),
            voice: voice.clone(),
            response_format: Some(SpeechResponseFormat::Mp3),
            speed: None,
        };

        let response = self.client.audio().speech(request).await.map_err(|e| {
            tracing::error!(
                error = %e,
                model = %self.model,
                voice = ?voice,
                text_length = text.len(),
                "OpenAI TTS API call failed"
            );
            format!("OpenAI TTS error: {}", e)
        })?;

        let audio_bytes = response.bytes.to_vec();
        tracing::debug!(
            audio_size = audio_bytes.len(),
            "OpenAI TTS audio received successfully"
        );

        Ok(audio_bytes)
    }
}
