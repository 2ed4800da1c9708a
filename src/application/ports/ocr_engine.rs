use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("network error: {0}")]
    Network(String),
    #[error("ocr service error: {0}")]
    Service(String),
    #[error("unreadable ocr response: {0}")]
    Response(String),
}

/// One recognized page: OCR text plus the rendered page image when the
/// engine returns it.
#[derive(Debug, Clone, PartialEq)]
pub struct OcrPage {
    pub number: u32,
    pub text: String,
    pub image_png: Option<Vec<u8>>,
}

/// OCR capability. The engine is a bounded resource: `lease` hands out a
/// scanner backed by a permit that is released when the scanner drops,
/// so a document-processing invocation can never leak its slot across
/// documents, whatever its exit path.
#[async_trait]
pub trait OcrEngine: Send + Sync {
    async fn lease(&self) -> Result<Box<dyn OcrScanner>, OcrError>;
}

#[async_trait]
pub trait OcrScanner: Send {
    /// Render each page at the engine's fixed upscale factor and run
    /// recognition, returning one entry per page in page order.
    async fn recognize(&self, pdf_bytes: &[u8]) -> Result<Vec<OcrPage>, OcrError>;
}
