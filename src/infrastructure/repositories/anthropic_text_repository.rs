//! Anthropic Messages API implementation of the text generation repository.
//!
//! Uses reqwest directly. Long single-pass generations are streamed over SSE
//! so the request does not hit the API's non-streaming timeout.

use super::text_generation_repository::TextGenerationRepository;
use crate::domain::script::GenerationRequest;
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::{Deserialize, Serialize};

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";

pub struct AnthropicTextRepository {
    client: reqwest::Client,
    api_key: String,
    model: String,
    api_url: String,
}

impl AnthropicTextRepository {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            model,
            api_url: ANTHROPIC_API_URL.to_string(),
        }
    }

    /// Point the repository at a different Messages endpoint
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    fn headers(&self) -> Result<HeaderMap, String> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            "x-api-key",
            HeaderValue::from_str(&self.api_key).map_err(|_| "Invalid API key".to_string())?,
        );
        headers.insert(
            "anthropic-version",
            HeaderValue::from_static(ANTHROPIC_VERSION),
        );
        Ok(headers)
    }

    async fn send(&self, request: &GenerationRequest) -> Result<reqwest::Response, String> {
        let body = AnthropicRequest {
            model: &self.model,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            system: &request.system_prompt,
            messages: vec![AnthropicMessage {
                role: "user",
                content: &request.user_prompt,
            }],
            stream: request.stream,
        };

        let response = self
            .client
            .post(&self.api_url)
            .headers(self.headers()?)
            .json(&body)
            .send()
            .await
            .map_err(|e| format!("Anthropic request failed: {}", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let message = match response.json::<AnthropicError>().await {
                Ok(error) => error.error.message,
                Err(_) => "unreadable error body".to_string(),
            };
            return Err(format!("Anthropic API error {}: {}", status, message));
        }

        Ok(response)
    }

    async fn complete(&self, request: &GenerationRequest) -> Result<String, String> {
        let response: MessagesResponse = self
            .send(request)
            .await?
            .json()
            .await
            .map_err(|e| format!("Failed to parse Anthropic response: {}", e))?;

        Ok(response
            .content
            .into_iter()
            .filter_map(|block| match block {
                ResponseBlock::Text { text } => Some(text),
                ResponseBlock::Other => None,
            })
            .collect())
    }

    /// Read the SSE stream and join every text delta
    async fn complete_streaming(&self, request: &GenerationRequest) -> Result<String, String> {
        let response = self.send(request).await?;
        let mut stream = response.bytes_stream();
        let mut events = SseBuffer::default();
        let mut text = String::new();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| format!("Anthropic stream interrupted: {}", e))?;
            events.push(&chunk);

            while let Some(event) = events.next_event() {
                apply_event(&event?, &mut text)?;
            }
        }

        Ok(text)
    }
}

/// Raw bytes of an SSE stream. Events are only decoded once complete, so a
/// multi-byte character split across network chunks stays intact.
#[derive(Debug, Default)]
struct SseBuffer {
    bytes: Vec<u8>,
}

impl SseBuffer {
    fn push(&mut self, chunk: &[u8]) {
        self.bytes.extend_from_slice(chunk);
    }

    fn next_event(&mut self) -> Option<Result<String, String>> {
        let end = self.bytes.windows(2).position(|w| w == b"\n\n")?;
        let event: Vec<u8> = self.bytes.drain(..end + 2).collect();
        Some(String::from_utf8(event).map_err(|e| format!("Anthropic stream is not UTF-8: {}", e)))
    }
}

/// Append the text deltas of one SSE event
fn apply_event(event: &str, text: &mut String) -> Result<(), String> {
    for line in event.lines() {
        let Some(data) = line.strip_prefix("data: ") else {
            continue;
        };
        match serde_json::from_str::<StreamEvent>(data) {
            Ok(StreamEvent::ContentBlockDelta {
                delta: StreamDelta::TextDelta { text: delta },
            }) => text.push_str(&delta),
            Ok(StreamEvent::Error { error }) => {
                return Err(format!("Anthropic stream error: {}", error.message));
            }
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(error = %e, "Skipping unparsed Anthropic stream event");
            }
        }
    }
    Ok(())
}

#[async_trait]
impl TextGenerationRepository for AnthropicTextRepository {
    fn name(&self) -> &'static str {
        "anthropic"
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
            stream = request.stream,
            "Calling Anthropic messages API"
        );

        let result = if request.stream {
            self.complete_streaming(request).await
        } else {
            self.complete(request).await
        };

        let text = result.map_err(|e| {
            tracing::error!(
                error = %e,
                model = %self.model,
                prompt_length = request.user_prompt.len(),
                "Anthropic messages API call failed"
            );
            e
        })?;

        let text = text.trim().to_string();
        if text.is_empty() {
            return Err("Anthropic returned an empty message".to_string());
        }

        tracing::info!(
            provider = "anthropic",
            model = %self.model,
            latency_ms = start_time.elapsed().as_millis() as u64,
            response_length = text.len(),
            "Text generation completed"
        );

        Ok(text)
    }
}

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: Vec<AnthropicMessage<'a>>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    stream: bool,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ResponseBlock>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ResponseBlock {
    Text {
        text: String,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum StreamEvent {
    ContentBlockDelta {
        delta: StreamDelta,
    },
    Error {
        error: ErrorDetail,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum StreamDelta {
    TextDelta {
        text: String,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct AnthropicError {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}
