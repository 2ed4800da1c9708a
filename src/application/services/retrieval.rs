use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

use crate::application::ports::embedding_provider::{EmbeddingError, EmbeddingProvider};
use crate::domain::repositories::chunk_repository::{ChunkRepository, RankedChunk};

pub const DEFAULT_TOP_K: usize = 6;

#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("question embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),
    #[error("similarity search unavailable: {0}")]
    Search(String),
}

/// Chunks retrieved for a question. `degraded` marks the unranked
/// fallback path so callers and telemetry never mistake it for a real
/// similarity ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievedContext {
    pub chunks: Vec<RankedChunk>,
    pub degraded: bool,
}

impl RetrievedContext {
    pub fn empty() -> Self {
        Self {
            chunks: Vec::new(),
            degraded: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

pub struct RetrievalService {
    embedding_provider: Arc<dyn EmbeddingProvider>,
    chunk_repository: Arc<dyn ChunkRepository>,
}

impl RetrievalService {
    pub fn new(
        embedding_provider: Arc<dyn EmbeddingProvider>,
        chunk_repository: Arc<dyn ChunkRepository>,
    ) -> Self {
        Self {
            embedding_provider,
            chunk_repository,
        }
    }

    /// Embed the question and fetch the `top_k` most similar chunks in
    /// the workspace. A workspace without chunks yields an empty result.
    /// The unranked fallback fires only when the ranked search itself
    /// errors, never when it merely returns nothing.
    pub async fn retrieve(
        &self,
        workspace_id: Uuid,
        question: &str,
        top_k: usize,
    ) -> Result<RetrievedContext, RetrievalError> {
        let question_text = [question.to_string()];
        let mut vectors = self.embedding_provider.embed(&question_text).await?;
        let query_vector = vectors
            .pop()
            .ok_or_else(|| RetrievalError::Search("embedding provider returned nothing".into()))?;

        match self
            .chunk_repository
            .search_similar(workspace_id, &query_vector, top_k as i64)
            .await
        {
            Ok(chunks) => Ok(RetrievedContext {
                chunks,
                degraded: false,
            }),
            Err(search_error) => {
                tracing::warn!(
                    workspace = %workspace_id,
                    error = %search_error,
                    "similarity search failed, falling back to unranked chunks"
                );
                let chunks = self
                    .chunk_repository
                    .first_in_workspace(workspace_id, top_k as i64)
                    .await
                    .map_err(|e| RetrievalError::Search(e.to_string()))?;
                Ok(RetrievedContext {
                    chunks,
                    degraded: true,
                })
            }
        }
    }
}
