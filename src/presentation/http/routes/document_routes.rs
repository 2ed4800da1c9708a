use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;

use crate::presentation::http::handlers::DocumentHandler;

pub fn document_routes(document_handler: Arc<DocumentHandler>) -> Router {
    Router::new()
        .route("/documents", post(DocumentHandler::upload_document))
        .route("/documents", get(DocumentHandler::list_documents))
        .route("/documents/{document_id}", get(DocumentHandler::get_document))
        .route(
            "/documents/{document_id}",
            delete(DocumentHandler::delete_document),
        )
        .route(
            "/documents/{document_id}/reprocess",
            post(DocumentHandler::reprocess_document),
        )
        .with_state(document_handler)
}
