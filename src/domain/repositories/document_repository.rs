use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::entities::Document;
use crate::domain::value_objects::DocumentStatus;

#[derive(Debug, Error)]
pub enum DocumentRepositoryError {
    #[error("document not found: {0}")]
    NotFound(Uuid),
    #[error("database error: {0}")]
    Database(String),
    #[error("validation error: {0}")]
    Validation(String),
}

#[async_trait]
pub trait DocumentRepository: Send + Sync {
    async fn save(&self, document: &Document) -> Result<(), DocumentRepositoryError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Document>, DocumentRepositoryError>;

    async fn list(&self, skip: i64, limit: i64) -> Result<Vec<Document>, DocumentRepositoryError>;

    async fn count(&self) -> Result<i64, DocumentRepositoryError>;

    async fn update(&self, document: &Document) -> Result<(), DocumentRepositoryError>;

    /// Atomically claim the document for processing: one conditional
    /// update that succeeds only when the row is not already in
    /// `processing`. Returns false when another worker holds the claim.
    async fn try_claim_processing(&self, id: Uuid) -> Result<bool, DocumentRepositoryError>;

    /// Persist a status transition together with its (nullable) error
    /// annotation.
    async fn set_status(
        &self,
        id: Uuid,
        status: DocumentStatus,
        error: Option<String>,
    ) -> Result<(), DocumentRepositoryError>;

    async fn delete(&self, id: Uuid) -> Result<bool, DocumentRepositoryError>;
}
