use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::entities::Document;
use crate::domain::value_objects::DocumentMetadata;
use crate::presentation::http::dto::PaginationMetaDto;

/// The document contract exposed to the (out-of-scope) UI layer:
/// `status` and `error` are the fields it polls while processing runs.
#[derive(Debug, Serialize)]
pub struct DocumentResponseDto {
    pub id: Uuid,
    pub title: String,
    pub workspace_id: Uuid,
    pub owner_id: Uuid,
    pub status: String,
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<DocumentMetadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunk_count: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Document> for DocumentResponseDto {
    fn from(document: &Document) -> Self {
        Self {
            id: document.id(),
            title: document.title().to_string(),
            workspace_id: document.workspace_id(),
            owner_id: document.owner_id(),
            status: document.status().as_str().to_string(),
            error: document.error().map(|s| s.to_string()),
            metadata: document.metadata().cloned(),
            checksum: document.checksum().map(|s| s.to_string()),
            chunk_count: None,
            created_at: document.created_at(),
            updated_at: document.updated_at(),
        }
    }
}

impl DocumentResponseDto {
    pub fn with_chunk_count(mut self, count: i64) -> Self {
        self.chunk_count = Some(count);
        self
    }
}

#[derive(Debug, Serialize)]
pub struct UploadResponseDto {
    pub document: DocumentResponseDto,
    pub queued: bool,
}

#[derive(Debug, Serialize)]
pub struct DocumentListResponseDto {
    pub documents: Vec<DocumentResponseDto>,
    pub meta: PaginationMetaDto,
}
