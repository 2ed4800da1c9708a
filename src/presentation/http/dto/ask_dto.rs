use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::{Answer, Citation};

#[derive(Debug, Deserialize)]
pub struct AskRequestDto {
    pub question: String,
    pub workspace_id: Uuid,
    pub user_id: Uuid,
    #[serde(default)]
    pub top_k: Option<usize>,
    /// "grounded" or "conversational"; omitted means grounded answering
    /// over whatever the retriever found.
    #[serde(default)]
    pub mode: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CitationDto {
    pub index: usize,
    pub chunk_id: Uuid,
    pub document_id: Uuid,
    pub document_title: String,
    pub snippet: String,
}

impl From<Citation> for CitationDto {
    fn from(citation: Citation) -> Self {
        Self {
            index: citation.index,
            chunk_id: citation.chunk_id,
            document_id: citation.document_id,
            document_title: citation.document_title,
            snippet: citation.snippet,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AnswerResponseDto {
    pub answer: String,
    pub mode: String,
    pub citations: Vec<CitationDto>,
    pub insufficient_context: bool,
    pub degraded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
}

impl From<Answer> for AnswerResponseDto {
    fn from(answer: Answer) -> Self {
        Self {
            answer: answer.text,
            mode: answer.mode.as_str().to_string(),
            citations: answer.citations.into_iter().map(CitationDto::from).collect(),
            insufficient_context: answer.insufficient_context,
            degraded: answer.degraded,
            failure: answer.failure,
        }
    }
}
