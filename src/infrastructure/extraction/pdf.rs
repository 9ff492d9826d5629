use super::ExtractionError;
use lopdf::Document;

/// Text of every page, in page order. Pages whose text cannot be decoded are
/// skipped rather than failing the whole document.
pub fn extract_pdf_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    let document = Document::load_mem(bytes).map_err(|e| ExtractionError::Pdf(e.to_string()))?;
    let pages = document.get_pages();

    let mut text = String::new();
    for page_number in pages.keys() {
        match document.extract_text(&[*page_number]) {
            Ok(page_text) => text.push_str(&page_text),
            Err(e) => {
                tracing::warn!(page = page_number, error = %e, "Skipping unreadable PDF page");
            }
        }
    }

    tracing::debug!(
        page_count = pages.len(),
        text_length = text.len(),
        "PDF text extracted"
    );

    Ok(text)
}

/// Parsing is CPU bound, run it off the async workers
pub async fn extract_pdf(bytes: Vec<u8>) -> Result<String, ExtractionError> {
    tokio::task::spawn_blocking(move || extract_pdf_text(&bytes))
        .await
        .map_err(|e| ExtractionError::Other(anyhow::anyhow!("PDF extraction task failed: {}", e)))?
}
