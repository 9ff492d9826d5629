pub mod anthropic_text_repository;
pub mod native_tts_repository;
pub mod openai_text_repository;
pub mod openai_tts_repository;
pub mod polly_tts_repository;
pub mod text_generation_repository;
pub mod tone_tts_repository;
pub mod tts_repository;

pub use anthropic_text_repository::AnthropicTextRepository;
pub use native_tts_repository::{NativeEngine, NativeTtsRepository};
pub use openai_text_repository::OpenAiTextRepository;
pub use openai_tts_repository::OpenAiTtsRepository;
pub use polly_tts_repository::PollyTtsRepository;
pub use text_generation_repository::TextGenerationRepository;
pub use tone_tts_repository::ToneTtsRepository;
pub use tts_repository::TtsRepository;
