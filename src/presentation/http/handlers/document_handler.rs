use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use uuid::Uuid;

use crate::application::ports::ingest_queue::{IngestQueue, IngestRequest};
use crate::application::ports::object_storage::ObjectStorage;
use crate::domain::entities::Document;
use crate::domain::repositories::{ChunkRepository, DocumentRepository};
use crate::domain::value_objects::StoragePath;
use crate::presentation::http::dto::{
    ApiResponse, DocumentListResponseDto, DocumentResponseDto, MessageResponseDto, PaginationDto,
    PaginationMetaDto, UploadResponseDto,
};

pub struct DocumentHandler {
    document_repository: Arc<dyn DocumentRepository>,
    chunk_repository: Arc<dyn ChunkRepository>,
    object_storage: Arc<dyn ObjectStorage>,
    ingest_queue: Arc<dyn IngestQueue>,
}

struct UploadFields {
    file_name: String,
    bytes: Vec<u8>,
    workspace_id: Uuid,
    owner_id: Uuid,
    title: Option<String>,
}

impl DocumentHandler {
    pub fn new(
        document_repository: Arc<dyn DocumentRepository>,
        chunk_repository: Arc<dyn ChunkRepository>,
        object_storage: Arc<dyn ObjectStorage>,
        ingest_queue: Arc<dyn IngestQueue>,
    ) -> Self {
        Self {
            document_repository,
            chunk_repository,
            object_storage,
            ingest_queue,
        }
    }

    /// Store the uploaded bytes, create the document row in `uploading`
    /// state, and queue ingestion. Processing state is then observable
    /// through the document's `status`/`error` fields.
    pub async fn upload_document(
        State(handler): State<Arc<DocumentHandler>>,
        multipart: Multipart,
    ) -> Result<impl IntoResponse, StatusCode> {
        let fields = match read_upload_fields(multipart).await {
            Ok(fields) => fields,
            Err(message) => {
                return Ok((
                    StatusCode::BAD_REQUEST,
                    Json(ApiResponse::<UploadResponseDto>::error(
                        "INVALID_UPLOAD".to_string(),
                        message,
                        None,
                    )),
                ));
            }
        };

        let extension = fields
            .file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext)
            .unwrap_or("");
        let title = fields.title.unwrap_or_else(|| fields.file_name.clone());

        let mut document =
            Document::create(title, fields.workspace_id, fields.owner_id, extension);
        document.set_checksum(format!("{:x}", Sha256::digest(&fields.bytes)));

        if let Err(error) = handler
            .object_storage
            .put(document.storage_path(), &fields.bytes)
            .await
        {
            return Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(
                    "STORAGE_FAILED".to_string(),
                    error.to_string(),
                    None,
                )),
            ));
        }

        if let Err(error) = handler.document_repository.save(&document).await {
            return Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(
                    "SAVE_FAILED".to_string(),
                    error.to_string(),
                    None,
                )),
            ));
        }

        let queued = match handler
            .ingest_queue
            .enqueue(IngestRequest {
                document_id: document.id(),
                force: false,
            })
            .await
        {
            Ok(()) => true,
            Err(error) => {
                tracing::error!(document = %document.id(), error = %error, "failed to queue ingestion");
                false
            }
        };

        let dto = UploadResponseDto {
            document: DocumentResponseDto::from(&document),
            queued,
        };
        Ok((StatusCode::CREATED, Json(ApiResponse::success(dto))))
    }

    pub async fn get_document(
        State(handler): State<Arc<DocumentHandler>>,
        Path(document_id): Path<Uuid>,
    ) -> Result<impl IntoResponse, StatusCode> {
        match handler.document_repository.find_by_id(document_id).await {
            Ok(Some(document)) => {
                let chunk_count = handler
                    .chunk_repository
                    .count_by_document(document_id)
                    .await
                    .unwrap_or(0);
                let dto = DocumentResponseDto::from(&document).with_chunk_count(chunk_count);
                Ok((StatusCode::OK, Json(ApiResponse::success(dto))))
            }
            Ok(None) => Ok((
                StatusCode::NOT_FOUND,
                Json(ApiResponse::error(
                    "DOCUMENT_NOT_FOUND".to_string(),
                    format!("document {} does not exist", document_id),
                    None,
                )),
            )),
            Err(error) => Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(
                    "LOOKUP_FAILED".to_string(),
                    error.to_string(),
                    None,
                )),
            )),
        }
    }

    pub async fn list_documents(
        State(handler): State<Arc<DocumentHandler>>,
        Query(pagination): Query<PaginationDto>,
    ) -> Result<impl IntoResponse, StatusCode> {
        let documents = handler
            .document_repository
            .list(pagination.skip, pagination.limit)
            .await;
        let total = handler.document_repository.count().await;

        match (documents, total) {
            (Ok(documents), Ok(total)) => {
                let dto = DocumentListResponseDto {
                    documents: documents.iter().map(DocumentResponseDto::from).collect(),
                    meta: PaginationMetaDto {
                        offset: pagination.skip,
                        limit: pagination.limit,
                        total,
                    },
                };
                Ok((StatusCode::OK, Json(ApiResponse::success(dto))))
            }
            (Err(error), _) | (_, Err(error)) => Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<DocumentListResponseDto>::error(
                    "LIST_FAILED".to_string(),
                    error.to_string(),
                    None,
                )),
            )),
        }
    }

    /// Queue a forced re-ingest. The worker clears existing chunks and
    /// drives the status machine back through `processing`.
    pub async fn reprocess_document(
        State(handler): State<Arc<DocumentHandler>>,
        Path(document_id): Path<Uuid>,
    ) -> Result<impl IntoResponse, StatusCode> {
        match handler.document_repository.find_by_id(document_id).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                return Ok((
                    StatusCode::NOT_FOUND,
                    Json(ApiResponse::<MessageResponseDto>::error(
                        "DOCUMENT_NOT_FOUND".to_string(),
                        format!("document {} does not exist", document_id),
                        None,
                    )),
                ));
            }
            Err(error) => {
                return Ok((
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ApiResponse::error(
                        "LOOKUP_FAILED".to_string(),
                        error.to_string(),
                        None,
                    )),
                ));
            }
        }

        match handler
            .ingest_queue
            .enqueue(IngestRequest {
                document_id,
                force: true,
            })
            .await
        {
            Ok(()) => Ok((
                StatusCode::ACCEPTED,
                Json(ApiResponse::success(MessageResponseDto {
                    message: format!("document {} queued for reprocessing", document_id),
                })),
            )),
            Err(error) => Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(
                    "QUEUE_FAILED".to_string(),
                    error.to_string(),
                    None,
                )),
            )),
        }
    }

    pub async fn delete_document(
        State(handler): State<Arc<DocumentHandler>>,
        Path(document_id): Path<Uuid>,
    ) -> Result<impl IntoResponse, StatusCode> {
        let document = match handler.document_repository.find_by_id(document_id).await {
            Ok(Some(document)) => document,
            Ok(None) => {
                return Ok((
                    StatusCode::NOT_FOUND,
                    Json(ApiResponse::<MessageResponseDto>::error(
                        "DOCUMENT_NOT_FOUND".to_string(),
                        format!("document {} does not exist", document_id),
                        None,
                    )),
                ));
            }
            Err(error) => {
                return Ok((
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ApiResponse::error(
                        "LOOKUP_FAILED".to_string(),
                        error.to_string(),
                        None,
                    )),
                ));
            }
        };

        if let Err(error) = handler.document_repository.delete(document_id).await {
            return Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(
                    "DELETE_FAILED".to_string(),
                    error.to_string(),
                    None,
                )),
            ));
        }

        // Chunk rows cascade with the document; stored objects are swept
        // by prefix.
        let prefix = StoragePath::new(document.workspace_id(), document_id).prefix();
        match handler.object_storage.list(&prefix).await {
            Ok(keys) => {
                for key in keys {
                    if let Err(error) = handler.object_storage.delete(&key).await {
                        tracing::warn!(key, error = %error, "failed to delete stored object");
                    }
                }
            }
            Err(error) => {
                tracing::warn!(prefix, error = %error, "failed to list stored objects for cleanup");
            }
        }

        Ok((
            StatusCode::OK,
            Json(ApiResponse::success(MessageResponseDto {
                message: format!("document {} deleted", document_id),
            })),
        ))
    }
}

async fn read_upload_fields(mut multipart: Multipart) -> Result<UploadFields, String> {
    let mut file: Option<(String, Vec<u8>)> = None;
    let mut workspace_id = None;
    let mut owner_id = None;
    let mut title = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| format!("malformed multipart body: {}", e))?
    {
        match field.name() {
            Some("file") => {
                let file_name = field
                    .file_name()
                    .ok_or_else(|| "file field has no file name".to_string())?
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| format!("failed to read file bytes: {}", e))?
                    .to_vec();
                file = Some((file_name, bytes));
            }
            Some("workspace_id") => {
                let value = field.text().await.map_err(|e| e.to_string())?;
                workspace_id =
                    Some(Uuid::parse_str(value.trim()).map_err(|_| "invalid workspace_id")?);
            }
            Some("owner_id") => {
                let value = field.text().await.map_err(|e| e.to_string())?;
                owner_id = Some(Uuid::parse_str(value.trim()).map_err(|_| "invalid owner_id")?);
            }
            Some("title") => {
                let value = field.text().await.map_err(|e| e.to_string())?;
                if !value.trim().is_empty() {
                    title = Some(value.trim().to_string());
                }
            }
            _ => {}
        }
    }

    let (file_name, bytes) = file.ok_or_else(|| "no file provided".to_string())?;
    if bytes.is_empty() {
        return Err("uploaded file is empty".to_string());
    }

    Ok(UploadFields {
        file_name,
        bytes,
        workspace_id: workspace_id.ok_or_else(|| "workspace_id is required".to_string())?,
        owner_id: owner_id.ok_or_else(|| "owner_id is required".to_string())?,
        title,
    })
}
