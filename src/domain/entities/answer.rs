use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How an answer was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerMode {
    /// Answer assembled from retrieved document context.
    Grounded,
    /// Free conversation without document grounding.
    Conversational,
}

impl AnswerMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnswerMode::Grounded => "grounded",
            AnswerMode::Conversational => "conversational",
        }
    }

    pub fn parse(value: &str) -> Result<Self, String> {
        match value.to_lowercase().as_str() {
            "grounded" => Ok(AnswerMode::Grounded),
            "conversational" => Ok(AnswerMode::Conversational),
            other => Err(format!("invalid answer mode: {}", other)),
        }
    }
}

/// Binds an in-text `[Source n]` reference to the chunk it points at.
/// `index` is 1-based and matches the numbered header used when the
/// context block was assembled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    pub index: usize,
    pub chunk_id: Uuid,
    pub document_id: Uuid,
    pub document_title: String,
    pub snippet: String,
}

/// Outcome of the question-answering surface. This is always a success
/// payload; internal failures surface as `failure` plus a user-safe
/// `text`, never as a transport error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub text: String,
    pub mode: AnswerMode,
    pub citations: Vec<Citation>,
    /// True when no usable context existed for a grounded answer.
    pub insufficient_context: bool,
    /// True when retrieval fell back to the unranked path or the
    /// generation call failed and a stock reply was substituted.
    pub degraded: bool,
    /// Internal error indicator kept for observability.
    pub failure: Option<String>,
}
