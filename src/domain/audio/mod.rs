pub mod error;
pub mod language;
pub mod service;

pub use error::AudioGenerationError;
pub use language::{detect_language, LanguageCode};
pub use service::{AudioGenerator, SynthesizedAudio};

use serde::Serialize;

/// Container format of the bytes a TTS backend returns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    Mp3,
    Wav,
}

impl AudioFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "mp3",
            AudioFormat::Wav => "wav",
        }
    }
}
