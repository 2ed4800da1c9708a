use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::entities::Document;
use crate::domain::repositories::document_repository::{
    DocumentRepository, DocumentRepositoryError,
};
use crate::domain::value_objects::DocumentStatus;
use crate::infrastructure::database::models::{DocumentModel, NewDocumentModel};
use crate::infrastructure::database::schema::documents;
use crate::infrastructure::database::{get_connection_from_pool, DbPool};

pub struct PostgresDocumentRepository {
    pool: DbPool,
}

impl PostgresDocumentRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentRepository for PostgresDocumentRepository {
    async fn save(&self, document: &Document) -> Result<(), DocumentRepositoryError> {
        let mut conn = get_connection_from_pool(&self.pool)
            .map_err(|e| DocumentRepositoryError::Database(e.to_string()))?;

        diesel::insert_into(documents::table)
            .values(NewDocumentModel::from(document))
            .execute(&mut conn)
            .map_err(|e| DocumentRepositoryError::Database(e.to_string()))?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Document>, DocumentRepositoryError> {
        let mut conn = get_connection_from_pool(&self.pool)
            .map_err(|e| DocumentRepositoryError::Database(e.to_string()))?;

        let model = documents::table
            .find(id)
            .first::<DocumentModel>(&mut conn)
            .optional()
            .map_err(|e| DocumentRepositoryError::Database(e.to_string()))?;

        match model {
            Some(model) => Document::try_from(model)
                .map(Some)
                .map_err(DocumentRepositoryError::Validation),
            None => Ok(None),
        }
    }

    async fn list(&self, skip: i64, limit: i64) -> Result<Vec<Document>, DocumentRepositoryError> {
        let mut conn = get_connection_from_pool(&self.pool)
            .map_err(|e| DocumentRepositoryError::Database(e.to_string()))?;

        let models = documents::table
            .order(documents::created_at.desc())
            .offset(skip)
            .limit(limit)
            .load::<DocumentModel>(&mut conn)
            .map_err(|e| DocumentRepositoryError::Database(e.to_string()))?;

        models
            .into_iter()
            .map(|model| Document::try_from(model).map_err(DocumentRepositoryError::Validation))
            .collect()
    }

    async fn count(&self) -> Result<i64, DocumentRepositoryError> {
        let mut conn = get_connection_from_pool(&self.pool)
            .map_err(|e| DocumentRepositoryError::Database(e.to_string()))?;

        documents::table
            .count()
            .get_result(&mut conn)
            .map_err(|e| DocumentRepositoryError::Database(e.to_string()))
    }

    async fn update(&self, document: &Document) -> Result<(), DocumentRepositoryError> {
        let mut conn = get_connection_from_pool(&self.pool)
            .map_err(|e| DocumentRepositoryError::Database(e.to_string()))?;

        diesel::update(documents::table.find(document.id()))
            .set(NewDocumentModel::from(document))
            .execute(&mut conn)
            .map_err(|e| DocumentRepositoryError::Database(e.to_string()))?;

        Ok(())
    }

    async fn try_claim_processing(&self, id: Uuid) -> Result<bool, DocumentRepositoryError> {
        let mut conn = get_connection_from_pool(&self.pool)
            .map_err(|e| DocumentRepositoryError::Database(e.to_string()))?;

        // One conditional update; a row already in `processing` is left
        // untouched and the claim is reported as lost.
        let claimed = diesel::update(
            documents::table
                .find(id)
                .filter(documents::status.ne(DocumentStatus::Processing.as_str())),
        )
        .set((
            documents::status.eq(DocumentStatus::Processing.as_str()),
            documents::error.eq::<Option<String>>(None),
            documents::updated_at.eq(Utc::now()),
        ))
        .execute(&mut conn)
        .map_err(|e| DocumentRepositoryError::Database(e.to_string()))?;

        Ok(claimed > 0)
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: DocumentStatus,
        error: Option<String>,
    ) -> Result<(), DocumentRepositoryError> {
        let mut conn = get_connection_from_pool(&self.pool)
            .map_err(|e| DocumentRepositoryError::Database(e.to_string()))?;

        let updated = diesel::update(documents::table.find(id))
            .set((
                documents::status.eq(status.as_str()),
                documents::error.eq(error),
                documents::updated_at.eq(Utc::now()),
            ))
            .execute(&mut conn)
            .map_err(|e| DocumentRepositoryError::Database(e.to_string()))?;

        if updated == 0 {
            return Err(DocumentRepositoryError::NotFound(id));
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DocumentRepositoryError> {
        let mut conn = get_connection_from_pool(&self.pool)
            .map_err(|e| DocumentRepositoryError::Database(e.to_string()))?;

        let deleted = diesel::delete(documents::table.find(id))
            .execute(&mut conn)
            .map_err(|e| DocumentRepositoryError::Database(e.to_string()))?;

        Ok(deleted > 0)
    }
}
