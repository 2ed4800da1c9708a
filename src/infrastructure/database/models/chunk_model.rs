use chrono::{DateTime, Utc};
use diesel::prelude::*;
use pgvector::Vector;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::entities::Chunk;
use crate::infrastructure::database::schema::chunks;

#[derive(Debug, Clone, Queryable, Selectable, Serialize, Identifiable, Associations)]
#[diesel(belongs_to(super::DocumentModel, foreign_key = document_id))]
#[diesel(table_name = chunks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ChunkModel {
    pub id: Uuid,
    pub document_id: Uuid,
    pub chunk_index: i32,
    pub chunk_text: String,
    pub embedding: Vector,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = chunks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewChunkModel {
    pub id: Uuid,
    pub document_id: Uuid,
    pub chunk_index: i32,
    pub chunk_text: String,
    pub embedding: Vector,
    pub created_at: DateTime<Utc>,
}

impl From<&Chunk> for NewChunkModel {
    fn from(chunk: &Chunk) -> Self {
        Self {
            id: chunk.id(),
            document_id: chunk.document_id(),
            chunk_index: chunk.chunk_index(),
            chunk_text: chunk.chunk_text().to_string(),
            embedding: chunk.embedding().clone(),
            created_at: chunk.created_at(),
        }
    }
}

impl From<ChunkModel> for Chunk {
    fn from(model: ChunkModel) -> Self {
        Chunk::restore(
            model.id,
            model.document_id,
            model.chunk_index,
            model.chunk_text,
            model.embedding,
            model.created_at,
        )
    }
}
