use async_trait::async_trait;
use pgvector::Vector;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::entities::Chunk;

#[derive(Debug, Error)]
pub enum ChunkRepositoryError {
    #[error("database error: {0}")]
    Database(String),
    #[error("similarity search unavailable: {0}")]
    SearchUnavailable(String),
}

/// A chunk returned by the retrieval path, joined with its document's
/// title. `distance` is absent when the row came from the degraded
/// unranked fallback.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedChunk {
    pub chunk: Chunk,
    pub document_title: String,
    pub distance: Option<f64>,
}

#[async_trait]
pub trait ChunkRepository: Send + Sync {
    async fn save(&self, chunk: &Chunk) -> Result<(), ChunkRepositoryError>;

    async fn count_by_document(&self, document_id: Uuid) -> Result<i64, ChunkRepositoryError>;

    async fn delete_by_document(&self, document_id: Uuid) -> Result<i64, ChunkRepositoryError>;

    /// Vector similarity search scoped to a workspace, ordered by
    /// distance, limited to `limit` rows.
    async fn search_similar(
        &self,
        workspace_id: Uuid,
        query: &Vector,
        limit: i64,
    ) -> Result<Vec<RankedChunk>, ChunkRepositoryError>;

    /// Unranked fallback: the first `limit` chunks of the workspace in
    /// insertion order. Only meaningful when similarity search is down.
    async fn first_in_workspace(
        &self,
        workspace_id: Uuid,
        limit: i64,
    ) -> Result<Vec<RankedChunk>, ChunkRepositoryError>;
}
