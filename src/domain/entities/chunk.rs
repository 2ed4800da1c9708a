use chrono::{DateTime, Utc};
use pgvector::Vector;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A bounded, embedded segment of a document. Immutable once written;
/// only stored when its embedding succeeded, so the persisted corpus
/// never contains placeholder vectors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    id: Uuid,
    document_id: Uuid,
    chunk_index: i32,
    chunk_text: String,
    embedding: Vector,
    created_at: DateTime<Utc>,
}

impl Chunk {
    pub fn new(document_id: Uuid, chunk_index: i32, chunk_text: String, embedding: Vector) -> Self {
        Self {
            id: Uuid::new_v4(),
            document_id,
            chunk_index,
            chunk_text,
            embedding,
            created_at: Utc::now(),
        }
    }

    pub fn restore(
        id: Uuid,
        document_id: Uuid,
        chunk_index: i32,
        chunk_text: String,
        embedding: Vector,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            document_id,
            chunk_index,
            chunk_text,
            embedding,
            created_at,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn document_id(&self) -> Uuid {
        self.document_id
    }

    pub fn chunk_index(&self) -> i32 {
        self.chunk_index
    }

    pub fn chunk_text(&self) -> &str {
        &self.chunk_text
    }

    pub fn embedding(&self) -> &Vector {
        &self.embedding
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn dimension(&self) -> usize {
        self.embedding.as_slice().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_reports_its_dimension() {
        let chunk = Chunk::new(
            Uuid::new_v4(),
            0,
            "some segment".to_string(),
            Vector::from(vec![0.1, 0.2, 0.3]),
        );

        assert_eq!(chunk.dimension(), 3);
        assert_eq!(chunk.chunk_index(), 0);
    }
}
