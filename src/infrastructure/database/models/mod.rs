pub mod chunk_model;
pub mod document_model;
pub mod query_model;

pub use chunk_model::{ChunkModel, NewChunkModel};
pub use document_model::{DocumentModel, NewDocumentModel};
pub use query_model::NewQueryModel;
