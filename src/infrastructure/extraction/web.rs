use super::{pdf::extract_pdf, ExtractionError};
use regex::Regex;
use reqwest::{header::CONTENT_TYPE, Client, Url};
use std::time::Duration;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Lines this short are navigation, captions or buttons
const MIN_LINE_LENGTH: usize = 16;
const BOILERPLATE_PREFIXES: [&str; 4] = ["cookie", "subscribe", "follow", "share"];
/// Below this the line filter threw too much away, keep the whole text instead
const MIN_FILTERED_LENGTH: usize = 300;
const REMOVED_TAGS: [&str; 8] = [
    "script", "style", "nav", "header", "footer", "aside", "menu", "form",
];

/// Only absolute http(s) URLs with a host are fetched
pub fn validate_url(source: &str) -> Result<Url, ExtractionError> {
    let url = Url::parse(source.trim()).map_err(|e| ExtractionError::InvalidUrl(e.to_string()))?;
    match url.scheme() {
        "http" | "https" if url.host_str().is_some() => Ok(url),
        scheme => Err(ExtractionError::InvalidUrl(format!(
            "unsupported scheme '{}' or missing host",
            scheme
        ))),
    }
}

pub struct WebExtractor {
    client: Client,
}

impl WebExtractor {
    pub fn new() -> Result<Self, ExtractionError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(|e| ExtractionError::Other(e.into()))?;
        Ok(Self { client })
    }

    /// Fetch a page and return its readable text. PDF responses go through
    /// the PDF extractor.
    pub async fn extract(&self, url: &Url) -> Result<String, ExtractionError> {
        let fetch_error = |e: reqwest::Error| ExtractionError::Fetch {
            url: url.to_string(),
            reason: e.to_string(),
        };

        tracing::info!(url = %url, "Fetching web content");
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(fetch_error)?;

        let is_pdf = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.contains("pdf"))
            .unwrap_or(false)
            || url.path().ends_with(".pdf");

        if is_pdf {
            let bytes = response.bytes().await.map_err(fetch_error)?;
            tracing::info!(url = %url, size = bytes.len(), "Fetched PDF document");
            return extract_pdf(bytes.to_vec()).await;
        }

        let html = response.text().await.map_err(fetch_error)?;
        let text = clean_html(&html)?;
        tracing::info!(
            url = %url,
            html_length = html.len(),
            text_length = text.len(),
            "Web content extracted"
        );
        Ok(text)
    }
}

/// Reduce an HTML page to its readable text
pub fn clean_html(html: &str) -> Result<String, ExtractionError> {
    let mut stripped = html.to_string();
    for tag in REMOVED_TAGS {
        let pattern = Regex::new(&format!(r"(?is)<{tag}\b[^>]*>.*?</{tag}\s*>"))
            .map_err(|e| ExtractionError::Other(e.into()))?;
        stripped = pattern.replace_all(&stripped, " ").into_owned();
    }

    let main_content = main_content(&stripped)?.unwrap_or(stripped.as_str());
    let text = html2text::from_read(main_content.as_bytes(), usize::MAX);

    let whitespace = Regex::new(r"\s+").map_err(|e| ExtractionError::Other(e.into()))?;
    let kept: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| line.chars().count() >= MIN_LINE_LENGTH)
        .filter(|line| {
            let lower = line.to_lowercase();
            !BOILERPLATE_PREFIXES
                .iter()
                .any(|prefix| lower.starts_with(prefix))
        })
        .collect();
    let filtered = kept.join("\n\n");

    let result = if filtered.chars().count() < MIN_FILTERED_LENGTH {
        whitespace.replace_all(&text, " ")
    } else {
        whitespace.replace_all(&filtered, " ")
    };

    Ok(result.trim().to_string())
}

/// First `<article>`, else first `<main>`, including the tags
fn main_content(html: &str) -> Result<Option<&str>, ExtractionError> {
    for tag in ["article", "main"] {
        let pattern = Regex::new(&format!(r"(?is)<{tag}\b[^>]*>.*?</{tag}\s*>"))
            .map_err(|e| ExtractionError::Other(e.into()))?;
        if let Some(found) = pattern.find(html) {
            return Ok(Some(found.as_str()));
        }
    }
    Ok(None)
}
