use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lifecycle state of a document inside the ingestion pipeline.
///
/// Transitions only move forward (`Uploading -> Processing -> Ready | Failed`),
/// except that a terminal state may re-enter `Processing` on an explicit
/// reprocessing request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    Uploading,
    Processing,
    Ready,
    Failed,
}

#[derive(Debug, Error)]
#[error("invalid status transition: {from} -> {to}")]
pub struct InvalidTransition {
    pub from: DocumentStatus,
    pub to: DocumentStatus,
}

impl DocumentStatus {
    pub fn is_processing(&self) -> bool {
        matches!(self, DocumentStatus::Processing)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, DocumentStatus::Ready | DocumentStatus::Failed)
    }

    pub fn can_transition_to(&self, next: DocumentStatus) -> bool {
        matches!(
            (self, next),
            (DocumentStatus::Uploading, DocumentStatus::Processing)
                | (DocumentStatus::Processing, DocumentStatus::Ready)
                | (DocumentStatus::Processing, DocumentStatus::Failed)
                | (DocumentStatus::Ready, DocumentStatus::Processing)
                | (DocumentStatus::Failed, DocumentStatus::Processing)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Uploading => "uploading",
            DocumentStatus::Processing => "processing",
            DocumentStatus::Ready => "ready",
            DocumentStatus::Failed => "failed",
        }
    }

    pub fn parse(value: &str) -> Result<Self, String> {
        match value.to_lowercase().as_str() {
            "uploading" => Ok(DocumentStatus::Uploading),
            "processing" => Ok(DocumentStatus::Processing),
            "ready" => Ok(DocumentStatus::Ready),
            "failed" => Ok(DocumentStatus::Failed),
            other => Err(format!("invalid document status: {}", other)),
        }
    }
}

impl std::fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_transitions_are_allowed() {
        assert!(DocumentStatus::Uploading.can_transition_to(DocumentStatus::Processing));
        assert!(DocumentStatus::Processing.can_transition_to(DocumentStatus::Ready));
        assert!(DocumentStatus::Processing.can_transition_to(DocumentStatus::Failed));
    }

    #[test]
    fn terminal_states_reenter_processing_only() {
        assert!(DocumentStatus::Ready.can_transition_to(DocumentStatus::Processing));
        assert!(DocumentStatus::Failed.can_transition_to(DocumentStatus::Processing));

        assert!(!DocumentStatus::Ready.can_transition_to(DocumentStatus::Failed));
        assert!(!DocumentStatus::Failed.can_transition_to(DocumentStatus::Ready));
        assert!(!DocumentStatus::Uploading.can_transition_to(DocumentStatus::Ready));
    }

    #[test]
    fn string_round_trip() {
        for status in [
            DocumentStatus::Uploading,
            DocumentStatus::Processing,
            DocumentStatus::Ready,
            DocumentStatus::Failed,
        ] {
            assert_eq!(DocumentStatus::parse(status.as_str()).unwrap(), status);
        }
        assert!(DocumentStatus::parse("stuck").is_err());
    }
}
