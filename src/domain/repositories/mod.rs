pub mod chunk_repository;
pub mod document_repository;
pub mod query_repository;

pub use chunk_repository::{ChunkRepository, RankedChunk};
pub use document_repository::DocumentRepository;
pub use query_repository::QueryRepository;
