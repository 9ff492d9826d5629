#[derive(Debug, thiserror::Error, PartialEq)]
pub enum AudioGenerationError {
    #[error("script is empty")]
    EmptyScript,
    #[error("no TTS backend configured")]
    NoBackendConfigured,
    #[error("all TTS backends failed: {}", .0.join("; "))]
    AllBackendsFailed(Vec<String>),
}
