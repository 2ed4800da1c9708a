use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::entities::QueryRecord;
use crate::infrastructure::database::schema::queries;

#[derive(Debug, Insertable)]
#[diesel(table_name = queries)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewQueryModel {
    pub id: Uuid,
    pub workspace_id: Uuid,
    pub user_id: Uuid,
    pub question_text: String,
    pub model_used: String,
    pub created_at: DateTime<Utc>,
}

impl From<&QueryRecord> for NewQueryModel {
    fn from(query: &QueryRecord) -> Self {
        Self {
            id: query.id(),
            workspace_id: query.workspace_id(),
            user_id: query.user_id(),
            question_text: query.question_text().to_string(),
            model_used: query.model_used().to_string(),
            created_at: query.created_at(),
        }
    }
}
