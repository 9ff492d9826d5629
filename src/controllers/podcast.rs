use axum::{
    extract::{FromRequest, Multipart, Request, State},
    http::header,
    Json,
};
use std::sync::Arc;

use crate::{
    domain::{
        content::{RawContent, SourceType},
        podcast::{
            GenerateRequest, GenerateResponse, PodcastService, PodcastServiceApi, TestApiResponse,
        },
    },
    error::{AppError, AppResult},
    infrastructure::extraction::{extract_pdf, validate_url, WebExtractor},
};

const FILE_FIELD: &str = "file";

pub struct PodcastController {
    podcast_service: Arc<PodcastService>,
    web_extractor: Arc<WebExtractor>,
}

impl PodcastController {
    pub fn new(podcast_service: Arc<PodcastService>, web_extractor: Arc<WebExtractor>) -> Self {
        Self {
            podcast_service,
            web_extractor,
        }
    }

    /// POST /generate - PDF upload (multipart `file`) or JSON `{"source": url}`
    pub async fn generate(
        State(controller): State<Arc<PodcastController>>,
        request: Request,
    ) -> AppResult<Json<GenerateResponse>> {
        let content_type = request
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_lowercase();

        let content = if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(request, &())
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            controller.content_from_upload(multipart).await?
        } else if content_type.starts_with("application/json") {
            let Json(body) = Json::<GenerateRequest>::from_request(request, &())
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            controller.content_from_url(&body.source).await?
        } else {
            return Err(AppError::BadRequest(
                "Expected a PDF upload or a JSON body with a source URL".to_string(),
            ));
        };

        let min_length = controller.podcast_service.min_content_length();
        if content.text.trim().chars().count() < min_length {
            return Err(AppError::BadRequest(
                "Could not extract sufficient content from the source".to_string(),
            ));
        }

        let result = controller
            .podcast_service
            .generate_podcast(content)
            .await
            .map_err(AppError::from)?;

        Ok(Json(GenerateResponse::from(result)))
    }

    /// GET /test-api - Check the generation backend answers
    pub async fn test_api(State(controller): State<Arc<PodcastController>>) -> Json<TestApiResponse> {
        match controller.podcast_service.test_generation().await {
            Ok(response) => Json(TestApiResponse::success(response)),
            Err(e) => {
                tracing::warn!(error = %e, "Generation backend test failed");
                Json(TestApiResponse::error(e.to_string()))
            }
        }
    }

    async fn content_from_upload(&self, mut multipart: Multipart) -> AppResult<RawContent> {
        while let Some(field) = multipart.next_field().await? {
            if field.name() != Some(FILE_FIELD) {
                continue;
            }

            let filename = field.file_name().unwrap_or_default().to_string();
            if filename.is_empty() {
                return Err(AppError::BadRequest("No file selected".to_string()));
            }
            if !filename.to_lowercase().ends_with(".pdf") {
                return Err(AppError::BadRequest(
                    "Invalid file type. Please upload a PDF".to_string(),
                ));
            }

            let bytes = field.bytes().await?;
            tracing::info!(filename = %filename, size = bytes.len(), "PDF uploaded");

            let text = extract_pdf(bytes.to_vec()).await?;
            return Ok(RawContent::new(text, SourceType::PdfUpload));
        }

        Err(AppError::BadRequest("No file provided".to_string()))
    }

    async fn content_from_url(&self, source: &str) -> AppResult<RawContent> {
        let url = validate_url(source)?;
        let text = self.web_extractor.extract(&url).await?;
        Ok(RawContent::new(text, SourceType::Url))
    }
}
