#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ScriptGenerationError {
    #[error("insufficient content: need at least {minimum} characters, got {actual}")]
    InsufficientContent { minimum: usize, actual: usize },
    #[error("text generation backend unavailable")]
    BackendUnavailable,
    #[error("generation failed: {0}")]
    GenerationFailed(String),
}
