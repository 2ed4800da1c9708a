use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum IngestQueueError {
    #[error("queue unavailable: {0}")]
    Unavailable(String),
}

/// A request to (re)ingest one document. `force` clears existing chunks
/// and bypasses the idempotent skip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestRequest {
    pub document_id: Uuid,
    pub force: bool,
}

#[async_trait]
pub trait IngestQueue: Send + Sync {
    async fn enqueue(&self, request: IngestRequest) -> Result<(), IngestQueueError>;
}
