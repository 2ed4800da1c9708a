use async_trait::async_trait;
use diesel::prelude::*;
use pgvector::{Vector, VectorExpressionMethods};
use uuid::Uuid;

use crate::domain::entities::Chunk;
use crate::domain::repositories::chunk_repository::{
    ChunkRepository, ChunkRepositoryError, RankedChunk,
};
use crate::infrastructure::database::models::{ChunkModel, NewChunkModel};
use crate::infrastructure::database::schema::{chunks, documents};
use crate::infrastructure::database::{get_connection_from_pool, DbPool};

pub struct PostgresChunkRepository {
    pool: DbPool,
}

impl PostgresChunkRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChunkRepository for PostgresChunkRepository {
    async fn save(&self, chunk: &Chunk) -> Result<(), ChunkRepositoryError> {
        let mut conn = get_connection_from_pool(&self.pool)
            .map_err(|e| ChunkRepositoryError::Database(e.to_string()))?;

        diesel::insert_into(chunks::table)
            .values(NewChunkModel::from(chunk))
            .execute(&mut conn)
            .map_err(|e| ChunkRepositoryError::Database(e.to_string()))?;

        Ok(())
    }

    async fn count_by_document(&self, document_id: Uuid) -> Result<i64, ChunkRepositoryError> {
        let mut conn = get_connection_from_pool(&self.pool)
            .map_err(|e| ChunkRepositoryError::Database(e.to_string()))?;

        chunks::table
            .filter(chunks::document_id.eq(document_id))
            .count()
            .get_result(&mut conn)
            .map_err(|e| ChunkRepositoryError::Database(e.to_string()))
    }

    async fn delete_by_document(&self, document_id: Uuid) -> Result<i64, ChunkRepositoryError> {
        let mut conn = get_connection_from_pool(&self.pool)
            .map_err(|e| ChunkRepositoryError::Database(e.to_string()))?;

        let deleted = diesel::delete(chunks::table.filter(chunks::document_id.eq(document_id)))
            .execute(&mut conn)
            .map_err(|e| ChunkRepositoryError::Database(e.to_string()))?;

        Ok(deleted as i64)
    }

    async fn search_similar(
        &self,
        workspace_id: Uuid,
        query: &Vector,
        limit: i64,
    ) -> Result<Vec<RankedChunk>, ChunkRepositoryError> {
        let mut conn = get_connection_from_pool(&self.pool)
            .map_err(|e| ChunkRepositoryError::SearchUnavailable(e.to_string()))?;

        let rows = chunks::table
            .inner_join(documents::table)
            .filter(documents::workspace_id.eq(workspace_id))
            .order(chunks::embedding.cosine_distance(query.clone()))
            .limit(limit)
            .select((
                ChunkModel::as_select(),
                documents::title,
                chunks::embedding.cosine_distance(query.clone()),
            ))
            .load::<(ChunkModel, String, f64)>(&mut conn)
            .map_err(|e| ChunkRepositoryError::SearchUnavailable(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|(model, document_title, distance)| RankedChunk {
                chunk: Chunk::from(model),
                document_title,
                distance: Some(distance),
            })
            .collect())
    }

    async fn first_in_workspace(
        &self,
        workspace_id: Uuid,
        limit: i64,
    ) -> Result<Vec<RankedChunk>, ChunkRepositoryError> {
        let mut conn = get_connection_from_pool(&self.pool)
            .map_err(|e| ChunkRepositoryError::Database(e.to_string()))?;

        let rows = chunks::table
            .inner_join(documents::table)
            .filter(documents::workspace_id.eq(workspace_id))
            .order((chunks::created_at.asc(), chunks::chunk_index.asc()))
            .limit(limit)
            .select((ChunkModel::as_select(), documents::title))
            .load::<(ChunkModel, String)>(&mut conn)
            .map_err(|e| ChunkRepositoryError::Database(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|(model, document_title)| RankedChunk {
                chunk: Chunk::from(model),
                document_title,
                distance: None,
            })
            .collect())
    }
}
