use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One asked question. Recorded once per request, before retrieval runs,
/// so the log is complete even when the answer path degrades.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryRecord {
    id: Uuid,
    workspace_id: Uuid,
    user_id: Uuid,
    question_text: String,
    model_used: String,
    created_at: DateTime<Utc>,
}

impl QueryRecord {
    pub fn new(workspace_id: Uuid, user_id: Uuid, question_text: String, model_used: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            workspace_id,
            user_id,
            question_text,
            model_used,
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn workspace_id(&self) -> Uuid {
        self.workspace_id
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn question_text(&self) -> &str {
        &self.question_text
    }

    pub fn model_used(&self) -> &str {
        &self.model_used
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
