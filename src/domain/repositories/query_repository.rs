use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::QueryRecord;

#[derive(Debug, Error)]
pub enum QueryRepositoryError {
    #[error("database error: {0}")]
    Database(String),
}

#[async_trait]
pub trait QueryRepository: Send + Sync {
    async fn record(&self, query: &QueryRecord) -> Result<(), QueryRepositoryError>;
}
