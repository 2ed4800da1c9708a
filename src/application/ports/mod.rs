pub mod document_extractor;
pub mod embedding_provider;
pub mod generation_provider;
pub mod ingest_queue;
pub mod object_storage;
pub mod ocr_engine;

pub use document_extractor::DocumentExtractor;
pub use embedding_provider::EmbeddingProvider;
pub use generation_provider::GenerationProvider;
pub use ingest_queue::IngestQueue;
pub use object_storage::ObjectStorage;
pub use ocr_engine::OcrEngine;
