use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::{DocumentMetadata, DocumentStatus, StoragePath};

/// An uploaded document. Created by the upload surface in `Uploading`
/// state; owned and mutated by the ingestion coordinator afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    id: Uuid,
    title: String,
    storage_path: String,
    workspace_id: Uuid,
    owner_id: Uuid,
    status: DocumentStatus,
    error: Option<String>,
    metadata: Option<DocumentMetadata>,
    checksum: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Document {
    /// Create a freshly uploaded document. The storage path is derived
    /// from the canonical constructor so there is exactly one spelling
    /// of where the bytes live.
    pub fn create(title: String, workspace_id: Uuid, owner_id: Uuid, extension: &str) -> Self {
        let id = Uuid::new_v4();
        let storage_path = StoragePath::new(workspace_id, id).original(extension);
        let now = Utc::now();
        Self {
            id,
            title,
            storage_path,
            workspace_id,
            owner_id,
            status: DocumentStatus::Uploading,
            error: None,
            metadata: None,
            checksum: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuild a document from persisted state.
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        id: Uuid,
        title: String,
        storage_path: String,
        workspace_id: Uuid,
        owner_id: Uuid,
        status: DocumentStatus,
        error: Option<String>,
        metadata: Option<DocumentMetadata>,
        checksum: Option<String>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title,
            storage_path,
            workspace_id,
            owner_id,
            status,
            error,
            metadata,
            checksum,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn storage_path(&self) -> &str {
        &self.storage_path
    }

    pub fn workspace_id(&self) -> Uuid {
        self.workspace_id
    }

    pub fn owner_id(&self) -> Uuid {
        self.owner_id
    }

    pub fn status(&self) -> DocumentStatus {
        self.status
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn metadata(&self) -> Option<&DocumentMetadata> {
        self.metadata.as_ref()
    }

    pub fn checksum(&self) -> Option<&str> {
        self.checksum.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn set_checksum(&mut self, checksum: String) {
        self.checksum = Some(checksum);
        self.updated_at = Utc::now();
    }

    pub fn set_metadata(&mut self, metadata: DocumentMetadata) {
        if !metadata.is_empty() {
            self.metadata = Some(metadata);
            self.updated_at = Utc::now();
        }
    }
}
