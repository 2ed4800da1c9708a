use async_trait::async_trait;
use pgvector::Vector;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("network error: {0}")]
    Network(String),
    #[error("provider error: {0}")]
    Provider(String),
    #[error("retries exhausted: {0}")]
    RetriesExhausted(String),
    #[error("embedding count mismatch: sent {sent} texts, received {received} vectors")]
    CountMismatch { sent: usize, received: usize },
    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

/// Batched embedding access. One call per invocation; the returned
/// vectors are in input order and share the fixed configured
/// dimensionality. Callers decide what a failure means for their batch;
/// substituting placeholder vectors is not an option this port offers.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vector>, EmbeddingError>;

    fn dimension(&self) -> usize;
}
