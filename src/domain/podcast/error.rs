use crate::domain::script::ScriptGenerationError;
use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum PodcastServiceError {
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error("no text generation backend configured")]
    BackendUnavailable,
    #[error("dependency error: {0}")]
    Dependency(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<ScriptGenerationError> for PodcastServiceError {
    fn from(err: ScriptGenerationError) -> Self {
        match err {
            ScriptGenerationError::InsufficientContent { .. } => {
                PodcastServiceError::Invalid(err.to_string())
            }
            ScriptGenerationError::BackendUnavailable => PodcastServiceError::BackendUnavailable,
            ScriptGenerationError::GenerationFailed(msg) => PodcastServiceError::Dependency(msg),
        }
    }
}

impl From<PodcastServiceError> for AppError {
    fn from(err: PodcastServiceError) -> Self {
        match err {
            PodcastServiceError::Invalid(msg) => AppError::BadRequest(msg),
            PodcastServiceError::BackendUnavailable => {
                AppError::Internal("No text generation backend configured".to_string())
            }
            PodcastServiceError::Dependency(msg) => AppError::ExternalService(msg),
            PodcastServiceError::Other(e) => AppError::Internal(e.to_string()),
        }
    }
}
