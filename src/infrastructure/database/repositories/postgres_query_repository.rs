use async_trait::async_trait;
use diesel::prelude::*;

use crate::domain::entities::QueryRecord;
use crate::domain::repositories::query_repository::{QueryRepository, QueryRepositoryError};
use crate::infrastructure::database::models::NewQueryModel;
use crate::infrastructure::database::schema::queries;
use crate::infrastructure::database::{get_connection_from_pool, DbPool};

pub struct PostgresQueryRepository {
    pool: DbPool,
}

impl PostgresQueryRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QueryRepository for PostgresQueryRepository {
    async fn record(&self, query: &QueryRecord) -> Result<(), QueryRepositoryError> {
        let mut conn = get_connection_from_pool(&self.pool)
            .map_err(|e| QueryRepositoryError::Database(e.to_string()))?;

        diesel::insert_into(queries::table)
            .values(NewQueryModel::from(query))
            .execute(&mut conn)
            .map_err(|e| QueryRepositoryError::Database(e.to_string()))?;

        Ok(())
    }
}
