use super::tts_repository::TtsRepository;
use crate::domain::audio::{AudioFormat, LanguageCode};
use async_trait::async_trait;
use hound::{SampleFormat, WavSpec, WavWriter};
use std::f64::consts::PI;
use std::io::Cursor;

pub const TONE_SAMPLE_RATE: u32 = 22_050;
const TONE_FREQUENCY_HZ: f64 = 440.0;
const TONE_AMPLITUDE: f64 = 16_000.0;
const MIN_DURATION_SECS: usize = 5;
const MAX_DURATION_SECS: usize = 30;
const CHARS_PER_SECOND: usize = 100;

/// Last link of the chain: a plain sine tone so the caller always gets
/// something playable. Not speech.
#[derive(Debug, Default)]
pub struct ToneTtsRepository;

impl ToneTtsRepository {
    pub fn new() -> Self {
        Self
    }

    pub fn duration_secs(text_length: usize) -> usize {
        (text_length / CHARS_PER_SECOND).clamp(MIN_DURATION_SECS, MAX_DURATION_SECS)
    }

    /// 16-bit mono PCM sine wave wrapped in a WAV container
    pub fn render(text_length: usize) -> Result<Vec<u8>, hound::Error> {
        let spec = WavSpec {
            channels: 1,
            sample_rate: TONE_SAMPLE_RATE,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let sample_count = Self::duration_secs(text_length) * TONE_SAMPLE_RATE as usize;

        let mut cursor = Cursor::new(Vec::with_capacity(44 + sample_count * 2));
        {
            let mut writer = WavWriter::new(&mut cursor, spec)?;
            for i in 0..sample_count {
                let t = i as f64 / TONE_SAMPLE_RATE as f64;
                let sample = (TONE_AMPLITUDE * (2.0 * PI * TONE_FREQUENCY_HZ * t).sin()) as i16;
                writer.write_sample(sample)?;
            }
            writer.finalize()?;
        }

        Ok(cursor.into_inner())
    }
}

#[async_trait]
impl TtsRepository for ToneTtsRepository {
    fn name(&self) -> &'static str {
        "tone"
    }

    fn max_chunk_size(&self) -> Option<usize> {
        None
    }

    fn audio_format(&self) -> AudioFormat {
        AudioFormat::Wav
    }

    fn is_speech(&self) -> bool {
        false
    }

    async fn synthesize_chunk(&self, text: &str, _language: LanguageCode) -> Result<Vec<u8>, String> {
        tracing::warn!(
            text_length = text.len(),
            duration_secs = Self::duration_secs(text.len()),
            "No speech backend produced audio, rendering fallback tone"
        );
        Self::render(text.len()).map_err(|e| format!("Failed to render tone: {}", e))
    }
}
