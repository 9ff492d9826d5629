use super::service::PodcastResult;
use serde::{Deserialize, Serialize};

/// JSON body for POST /generate
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub source: String,
}

/// Response for POST /generate
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub success: bool,
    pub script: String,
    pub source_type: String,
    pub content_length: usize,
    pub script_length: usize,
    pub content_type: String,
    pub length_tier: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_warning: Option<String>,
}

impl From<PodcastResult> for GenerateResponse {
    fn from(result: PodcastResult) -> Self {
        Self {
            success: true,
            script_length: result.script.chars().count(),
            script: result.script,
            source_type: result.source_type.to_string(),
            content_length: result.content_length,
            content_type: result.category.to_string(),
            length_tier: result.tier.as_str().to_string(),
            audio_url: result.audio.map(|audio| audio.url),
            audio_error: result.audio_error,
            audio_warning: result.audio_warning,
        }
    }
}

/// Response for GET /test-api
#[derive(Debug, Serialize, Deserialize)]
pub struct TestApiResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TestApiResponse {
    pub fn success(response: String) -> Self {
        Self {
            status: "success".to_string(),
            response: Some(response),
            error: None,
        }
    }

    pub fn error(error: String) -> Self {
        Self {
            status: "error".to_string(),
            response: None,
            error: Some(error),
        }
    }
}
