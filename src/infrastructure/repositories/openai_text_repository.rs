use super::text_generation_repository::TextGenerationRepository;
use crate::domain::script::GenerationRequest;
use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequest, CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use futures::StreamExt;
use std::sync::Arc;

/// OpenAI chat completions implementation of the text generation repository
pub struct OpenAiTextRepository {
    client: Arc<Client<OpenAIConfig>>,
    model: String,
}

impl OpenAiTextRepository {
    pub fn new(client: Arc<Client<OpenAIConfig>>, model: String) -> Self {
        Self { client, model }
    }

    fn build_request(
        &self,
        request: &GenerationRequest,
    ) -> Result<CreateChatCompletionRequest, OpenAIError> {
        let system = ChatCompletionRequestSystemMessageArgs::default()
            .content(request.system_prompt.as_str())
            .build()?;
        let user = ChatCompletionRequestUserMessageArgs::default()
            .content(request.user_prompt.as_str())
            .build()?;

        CreateChatCompletionRequestArgs::default()
            .model(self.model.as_str())
            .messages([system.into(), user.into()])
            .max_tokens(request.max_tokens)
            .temperature(request.temperature)
            .build()
    }

    async fn complete(&self, chat_request: CreateChatCompletionRequest) -> Result<String, OpenAIError> {
        let response = self.client.chat().create(chat_request).await?;

        Ok(response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default())
    }

    /// Stream the completion and join the content deltas
    async fn complete_streaming(
        &self,
        chat_request: CreateChatCompletionRequest,
    ) -> Result<String, OpenAIError> {
        let mut stream = self.client.chat().create_stream(chat_request).await?;
        let mut text = String::new();
        let mut delta_count = 0usize;

        while let Some(result) = stream.next().await {
            let response = result?;
            for choice in response.choices {
                if let Some(content) = choice.delta.content {
                    text.push_str(&content);
                    delta_count += 1;
                }
            }
        }

        tracing::debug!(
            delta_count = delta_count,
            text_length = text.len(),
            "OpenAI stream finished"
        );

        Ok(text)
    }
}

#[async_trait]
impl TextGenerationRepository for OpenAiTextRepository {
    fn name(&self) -> &'static str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String, String> {
        let start_time = std::time::Instant::now();

        tracing::info!(
            model = %self.model,
            prompt_length = request.user_prompt.len(),
            max_tokens = request.max_tokens,
            temperature = request.temperature,
            stream = request.stream,
            "Calling OpenAI chat completions API"
        );

        let chat_request = self.build_request(request).map_err(|e| {
            tracing::error!(error = %e, "Failed to build OpenAI chat request");
            format!("OpenAI request error: {}", e)
        })?;

        let result = if request.stream {
            self.complete_streaming(chat_request).await
        } else {
            self.complete(chat_request).await
        };

        let text = result.map_err(|e| {
            tracing::error!(
                error = %e,
                model = %self.model,
                prompt_length = request.user_prompt.len(),
                "OpenAI chat completions API call failed"
            );
            format!("OpenAI error: {}", e)
        })?;

        let text = text.trim().to_string();
        if text.is_empty() {
            tracing::warn!(model = %self.model, "OpenAI returned an empty completion");
            return Err("OpenAI returned an empty completion".to_string());
        }

        tracing::info!(
            provider = "openai",
            model = %self.model,
            latency_ms = start_time.elapsed().as_millis() as u64,
            response_length = text.len(),
            "Text generation completed"
        );

        Ok(text)
    }
}
