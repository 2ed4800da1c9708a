use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::Document;
use crate::domain::value_objects::DocumentMetadata;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),
    #[error("corrupted file: {0}")]
    CorruptedFile(String),
    #[error("no extractable text")]
    EmptyDocument,
    #[error("extraction failed: {0}")]
    ExtractionFailed(String),
    #[error("regex error: {0}")]
    Regex(#[from] regex::Error),
}

/// Result of text extraction: a single normalized text string plus
/// whatever document-level metadata the format carries.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedDocument {
    pub text: String,
    pub metadata: Option<DocumentMetadata>,
    pub page_count: Option<i32>,
}

/// Converts a document's raw bytes into normalized text, dispatching on
/// the declared file extension. Implementations may persist per-page
/// processing artifacts as a side effect.
#[async_trait]
pub trait DocumentExtractor: Send + Sync {
    async fn extract(
        &self,
        document: &Document,
        bytes: &[u8],
    ) -> Result<ExtractedDocument, ExtractionError>;
}
