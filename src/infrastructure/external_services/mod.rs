pub mod embedding_client;
pub mod generation_client;
pub mod ocr_client;

pub use embedding_client::{EmbeddingsClientConfig, HttpEmbeddingProvider};
pub use generation_client::{GenerationClientConfig, HttpGenerationProvider};
pub use ocr_client::{HttpOcrEngine, OcrClientConfig};
