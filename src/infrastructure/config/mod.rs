use crate::domain::content::LengthProfile;
use crate::domain::script::{ChunkFailurePolicy, GenerationMode};
use std::env;
use std::path::PathBuf;

const DEFAULT_OPENAI_MODEL: &str = "gpt-4o";
const DEFAULT_ANTHROPIC_MODEL: &str = "claude-3-5-sonnet-20241022";
/// Completion caps of the default models
const DEFAULT_OPENAI_MAX_OUTPUT_TOKENS: u32 = 16_384;
const DEFAULT_ANTHROPIC_MAX_OUTPUT_TOKENS: u32 = 8_192;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    pub log_format: LogFormat,
    // Files
    pub upload_folder: PathBuf,
    pub audio_folder: PathBuf,
    pub max_upload_bytes: usize,
    pub min_content_length: usize,
    // Script generation
    pub generation_provider: GenerationProvider,
    pub openai_api_key: Option<String>,
    pub anthropic_api_key: Option<String>,
    pub generation_model: String,
    /// Ceiling applied to every generation budget
    pub max_output_tokens: u32,
    pub generation_mode: GenerationMode,
    pub chunk_failure_policy: ChunkFailurePolicy,
    pub max_chunk_size: usize,
    pub paragraph_threshold: usize,
    pub chunk_overlap: usize,
    pub length_profile: LengthProfile,
    pub length_tier_breakpoints: Option<Vec<usize>>,
    // Audio
    pub tts_provider: TtsProvider,
    pub openai_tts_model: String,
    pub openai_tts_voice: String,
    pub aws_region: String,
    pub native_tts_enabled: bool,
    pub tone_fallback_enabled: bool,
    pub tts_retry_delay_ms: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GenerationProvider {
    OpenAi,
    Anthropic,
}

/// Primary cloud voice; the local fallbacks are configured separately
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TtsProvider {
    OpenAi,
    Polly,
    None,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        let generation_provider = match var_or("GENERATION_PROVIDER", "openai").to_lowercase().as_str() {
            "anthropic" => GenerationProvider::Anthropic,
            _ => GenerationProvider::OpenAi,
        };
        let (default_model, default_max_output_tokens) = match generation_provider {
            GenerationProvider::OpenAi => (DEFAULT_OPENAI_MODEL, DEFAULT_OPENAI_MAX_OUTPUT_TOKENS),
            GenerationProvider::Anthropic => {
                (DEFAULT_ANTHROPIC_MODEL, DEFAULT_ANTHROPIC_MAX_OUTPUT_TOKENS)
            }
        };

        let config = Config {
            host: var_or("HOST", "0.0.0.0"),
            port: var_or("PORT", "5000").parse()?,
            environment: match var_or("ENVIRONMENT", "development").as_str() {
                "production" => Environment::Production,
                _ => Environment::Development,
            },
            log_format: match var_or("LOG_FORMAT", "pretty").as_str() {
                "json" => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
            upload_folder: PathBuf::from(var_or("UPLOAD_FOLDER", "uploads")),
            audio_folder: PathBuf::from(var_or("AUDIO_FOLDER", "static/audio")),
            max_upload_bytes: var_or("MAX_UPLOAD_BYTES", "104857600").parse()?,
            min_content_length: var_or("MIN_CONTENT_LENGTH", "100").parse()?,
            generation_provider,
            openai_api_key: non_empty_var("OPENAI_API_KEY"),
            anthropic_api_key: non_empty_var("ANTHROPIC_API_KEY"),
            generation_model: non_empty_var("GENERATION_MODEL")
                .unwrap_or_else(|| default_model.to_string()),
            max_output_tokens: match non_empty_var("GENERATION_MAX_OUTPUT_TOKENS") {
                Some(value) => value.parse()?,
                None => default_max_output_tokens,
            },
            generation_mode: match var_or("GENERATION_MODE", "chunked").as_str() {
                "single_pass" => GenerationMode::SinglePass,
                _ => GenerationMode::Chunked,
            },
            chunk_failure_policy: match var_or("CHUNK_FAILURE_POLICY", "drop").as_str() {
                "abort" => ChunkFailurePolicy::AbortOnFirstFailure,
                _ => ChunkFailurePolicy::DropAndContinue,
            },
            max_chunk_size: var_or("MAX_CHUNK_SIZE", "50000").parse()?,
            paragraph_threshold: var_or("PARAGRAPH_THRESHOLD", "250000").parse()?,
            chunk_overlap: var_or("CHUNK_OVERLAP", "800").parse()?,
            length_profile: match var_or("LENGTH_PROFILE", "standard").as_str() {
                "high_context" => LengthProfile::HighContext,
                _ => LengthProfile::Standard,
            },
            length_tier_breakpoints: non_empty_var("LENGTH_TIER_BREAKPOINTS")
                .map(|value| parse_breakpoints(&value))
                .transpose()?,
            tts_provider: match var_or("TTS_PROVIDER", "openai").to_lowercase().as_str() {
                "polly" => TtsProvider::Polly,
                "none" => TtsProvider::None,
                _ => TtsProvider::OpenAi,
            },
            openai_tts_model: var_or("OPENAI_TTS_MODEL", "tts-1"),
            openai_tts_voice: var_or("OPENAI_TTS_VOICE", ""),
            aws_region: var_or("AWS_REGION", "eu-west-1"),
            native_tts_enabled: parse_bool(&var_or("NATIVE_TTS_ENABLED", "true")),
            tone_fallback_enabled: parse_bool(&var_or("TONE_FALLBACK_ENABLED", "true")),
            tts_retry_delay_ms: var_or("TTS_RETRY_DELAY_MS", "1000").parse()?,
        };

        Ok(config)
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_bool(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "true" | "1" | "yes")
}

/// Comma separated character counts, e.g. `2000,10000,30000`
fn parse_breakpoints(value: &str) -> Result<Vec<usize>, std::num::ParseIntError> {
    value
        .split(',')
        .map(|part| part.trim().parse::<usize>())
        .collect()
}
