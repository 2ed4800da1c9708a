use std::sync::Arc;

use async_trait::async_trait;

use crate::application::ports::document_extractor::{
    DocumentExtractor, ExtractedDocument, ExtractionError,
};
use crate::domain::entities::Document;
use crate::domain::value_objects::StoragePath;
use crate::infrastructure::extractors::{docx, normalize_text, PdfOcrExtractor};

/// Dispatches extraction by the declared file extension: plain text is
/// decoded as UTF-8, DOCX goes through the OOXML path, PDFs get the
/// OCR-augmented extractor, and anything else falls back to a lossy
/// UTF-8 decode.
pub struct CompositeExtractor {
    pdf_extractor: Arc<PdfOcrExtractor>,
}

impl CompositeExtractor {
    pub fn new(pdf_extractor: Arc<PdfOcrExtractor>) -> Self {
        Self { pdf_extractor }
    }
}

#[async_trait]
impl DocumentExtractor for CompositeExtractor {
    async fn extract(
        &self,
        document: &Document,
        bytes: &[u8],
    ) -> Result<ExtractedDocument, ExtractionError> {
        let extension = StoragePath::extension_of(document.storage_path()).to_lowercase();

        let raw = match extension.as_str() {
            "pdf" => return self.pdf_extractor.extract(document, bytes).await,
            "docx" => docx::extract_docx(bytes)?,
            "txt" | "md" => String::from_utf8_lossy(bytes).into_owned(),
            other => {
                tracing::debug!(extension = other, "unknown extension, decoding as utf-8");
                String::from_utf8_lossy(bytes).into_owned()
            }
        };

        let text = normalize_text(&raw);
        if text.is_empty() {
            return Err(ExtractionError::EmptyDocument);
        }

        Ok(ExtractedDocument {
            text,
            metadata: None,
            page_count: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::object_storage::{ObjectStorage, StorageError};
    use crate::application::ports::ocr_engine::{OcrEngine, OcrError, OcrScanner};
    use uuid::Uuid;

    struct NoStorage;

    #[async_trait]
    impl ObjectStorage for NoStorage {
        async fn get(&self, path: &str) -> Result<Vec<u8>, StorageError> {
            Err(StorageError::NotFound(path.to_string()))
        }

        async fn put(&self, _path: &str, _bytes: &[u8]) -> Result<(), StorageError> {
            Ok(())
        }

        async fn delete(&self, _path: &str) -> Result<bool, StorageError> {
            Ok(false)
        }

        async fn list(&self, _prefix: &str) -> Result<Vec<String>, StorageError> {
            Ok(Vec::new())
        }
    }

    struct NoOcr;

    #[async_trait]
    impl OcrEngine for NoOcr {
        async fn lease(&self) -> Result<Box<dyn OcrScanner>, OcrError> {
            Err(OcrError::Service("disabled".to_string()))
        }
    }

    fn extractor() -> CompositeExtractor {
        CompositeExtractor::new(Arc::new(
            PdfOcrExtractor::new(Arc::new(NoOcr), Arc::new(NoStorage)).unwrap(),
        ))
    }

    fn document_with_extension(extension: &str) -> Document {
        Document::create(
            format!("file.{}", extension),
            Uuid::new_v4(),
            Uuid::new_v4(),
            extension,
        )
    }

    #[tokio::test]
    async fn plain_text_is_decoded_and_normalized() {
        let document = document_with_extension("txt");
        let extracted = extractor()
            .extract(&document, b"hello   world\n\nnext  paragraph")
            .await
            .unwrap();

        assert_eq!(extracted.text, "hello world\n\nnext paragraph");
        assert!(extracted.metadata.is_none());
    }

    #[tokio::test]
    async fn unknown_extensions_fall_back_to_utf8() {
        let document = document_with_extension("log");
        let extracted = extractor().extract(&document, b"some log line").await.unwrap();
        assert_eq!(extracted.text, "some log line");
    }

    #[tokio::test]
    async fn empty_text_is_an_extraction_error() {
        let document = document_with_extension("txt");
        let result = extractor().extract(&document, b"   \n  ").await;
        assert!(matches!(result, Err(ExtractionError::EmptyDocument)));
    }

    #[tokio::test]
    async fn invalid_docx_is_rejected() {
        let document = document_with_extension("docx");
        let result = extractor().extract(&document, b"not an archive").await;
        assert!(matches!(result, Err(ExtractionError::CorruptedFile(_))));
    }
}
