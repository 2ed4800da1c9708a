use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;

use crate::application::services::{AskRequest, AskService};
use crate::domain::entities::AnswerMode;
use crate::presentation::http::dto::{AnswerResponseDto, ApiResponse, AskRequestDto};

pub struct AskHandler {
    ask_service: Arc<AskService>,
}

impl AskHandler {
    pub fn new(ask_service: Arc<AskService>) -> Self {
        Self { ask_service }
    }

    /// Answer a question over the workspace's documents. Internal
    /// retrieval/generation trouble is reported inside the success
    /// payload (`degraded`, `failure`), never as a transport error.
    pub async fn ask(
        State(handler): State<Arc<AskHandler>>,
        Json(request): Json<AskRequestDto>,
    ) -> Result<impl IntoResponse, StatusCode> {
        if request.question.trim().is_empty() {
            return Ok((
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::<AnswerResponseDto>::error(
                    "EMPTY_QUESTION".to_string(),
                    "question cannot be empty".to_string(),
                    None,
                )),
            ));
        }

        let mode = match request.mode.as_deref() {
            Some(raw) => match AnswerMode::parse(raw) {
                Ok(mode) => Some(mode),
                Err(message) => {
                    return Ok((
                        StatusCode::BAD_REQUEST,
                        Json(ApiResponse::error(
                            "INVALID_MODE".to_string(),
                            message,
                            None,
                        )),
                    ));
                }
            },
            None => None,
        };

        let answer = handler
            .ask_service
            .ask(AskRequest {
                workspace_id: request.workspace_id,
                user_id: request.user_id,
                question: request.question,
                top_k: request.top_k,
                mode,
            })
            .await;

        Ok((
            StatusCode::OK,
            Json(ApiResponse::success(AnswerResponseDto::from(answer))),
        ))
    }
}
