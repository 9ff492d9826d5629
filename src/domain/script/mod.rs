pub mod error;
pub mod prompts;
pub mod service;

pub use error::ScriptGenerationError;
pub use service::{GeneratedScript, ScriptGenerator};

/// One call to a text generation backend
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub system_prompt: String,
    pub user_prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub stream: bool,
}

/// How the script generator drives the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationMode {
    /// Split oversized content and combine the per-chunk scripts
    Chunked,
    /// Send the whole document in one streamed call (large-context backends)
    SinglePass,
}

/// What happens when one chunk's generation call fails in multi-chunk mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkFailurePolicy {
    /// Skip the chunk and keep going; its content is missing from the script
    DropAndContinue,
    /// Fail the whole generation on the first failed chunk
    AbortOnFirstFailure,
}
