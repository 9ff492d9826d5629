pub mod chunker;
pub mod classifier;
pub mod length;

pub use chunker::{split_paragraphs, split_sentences, Chunker, TextChunk};
pub use classifier::{classify, ContentCategory};
pub use length::{LengthPlan, LengthPlanner, LengthProfile, LengthTier};

use serde::{Deserialize, Serialize};

/// Where the extracted text came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceType {
    #[serde(rename = "PDF Upload")]
    PdfUpload,
    #[serde(rename = "URL")]
    Url,
}

impl SourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::PdfUpload => "PDF Upload",
            SourceType::Url => "URL",
        }
    }
}

impl std::fmt::Display for SourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Text produced by the extraction step, consumed once by the pipeline
#[derive(Debug, Clone)]
pub struct RawContent {
    pub text: String,
    pub source_type: SourceType,
}

impl RawContent {
    pub fn new(text: String, source_type: SourceType) -> Self {
        Self { text, source_type }
    }
}
