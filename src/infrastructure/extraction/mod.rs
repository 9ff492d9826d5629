use crate::error::AppError;

pub mod pdf;
pub mod web;

pub use pdf::{extract_pdf, extract_pdf_text};
pub use web::{clean_html, validate_url, WebExtractor};

#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("could not read PDF: {0}")]
    Pdf(String),
    #[error("failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<ExtractionError> for AppError {
    fn from(err: ExtractionError) -> Self {
        match err {
            ExtractionError::InvalidUrl(_) | ExtractionError::Pdf(_) | ExtractionError::Fetch { .. } => {
                AppError::BadRequest(err.to_string())
            }
            ExtractionError::Other(e) => AppError::Internal(e.to_string()),
        }
    }
}
