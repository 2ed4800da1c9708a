use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::entities::Document;
use crate::domain::value_objects::{DocumentMetadata, DocumentStatus};
use crate::infrastructure::database::schema::documents;

#[derive(Debug, Clone, Queryable, Selectable, Serialize, Identifiable)]
#[diesel(table_name = documents)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DocumentModel {
    pub id: Uuid,
    pub title: String,
    pub storage_path: String,
    pub workspace_id: Uuid,
    pub owner_id: Uuid,
    pub status: String,
    pub error: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub checksum: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = documents)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewDocumentModel {
    pub id: Uuid,
    pub title: String,
    pub storage_path: String,
    pub workspace_id: Uuid,
    pub owner_id: Uuid,
    pub status: String,
    pub error: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub checksum: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Document> for NewDocumentModel {
    fn from(document: &Document) -> Self {
        Self {
            id: document.id(),
            title: document.title().to_string(),
            storage_path: document.storage_path().to_string(),
            workspace_id: document.workspace_id(),
            owner_id: document.owner_id(),
            status: document.status().as_str().to_string(),
            error: document.error().map(|s| s.to_string()),
            metadata: document
                .metadata()
                .and_then(|m| serde_json::to_value(m).ok()),
            checksum: document.checksum().map(|s| s.to_string()),
            created_at: document.created_at(),
            updated_at: document.updated_at(),
        }
    }
}

impl TryFrom<DocumentModel> for Document {
    type Error = String;

    fn try_from(model: DocumentModel) -> Result<Self, Self::Error> {
        let status = DocumentStatus::parse(&model.status)?;
        let metadata = match model.metadata {
            Some(value) => Some(
                serde_json::from_value::<DocumentMetadata>(value)
                    .map_err(|e| format!("invalid document metadata: {}", e))?,
            ),
            None => None,
        };

        Ok(Document::restore(
            model.id,
            model.title,
            model.storage_path,
            model.workspace_id,
            model.owner_id,
            status,
            model.error,
            metadata,
            model.checksum,
            model.created_at,
            model.updated_at,
        ))
    }
}
