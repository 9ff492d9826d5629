use crate::domain::script::GenerationRequest;
use async_trait::async_trait;

/// Repository for text generation.
/// Abstracts the underlying LLM provider (OpenAI, Anthropic, etc.)
///
/// Implementations are responsible for:
/// - Mapping the request onto the provider's chat format
/// - Streaming the response when `request.stream` is set and joining the deltas
/// - Logging provider failures before returning them
#[async_trait]
pub trait TextGenerationRepository: Send + Sync {
    /// Provider name, used in logs and health output
    fn name(&self) -> &'static str;

    /// Model identifier sent to the provider
    fn model(&self) -> &str;

    /// Run one generation call and return the trimmed text
    ///
    /// # Errors
    /// Returns a description of the failure if the call fails or the response is empty
    async fn generate(&self, request: &GenerationRequest) -> Result<String, String>;
}
