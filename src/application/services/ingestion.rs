use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use uuid::Uuid;

use crate::application::ports::document_extractor::DocumentExtractor;
use crate::application::ports::embedding_provider::EmbeddingProvider;
use crate::application::ports::ingest_queue::IngestRequest;
use crate::application::ports::object_storage::ObjectStorage;
use crate::application::services::chunker::TextChunker;
use crate::application::services::rate_limit::RateLimiter;
use crate::domain::entities::{Chunk, Document};
use crate::domain::repositories::{ChunkRepository, DocumentRepository};
use crate::domain::value_objects::DocumentStatus;

#[derive(Debug, Error)]
pub enum IngestionError {
    #[error("document not found: {0}")]
    NotFound(Uuid),
    #[error("repository error: {0}")]
    Repository(String),
}

/// What one ingestion run did. Terminal pipeline failures are reported
/// here as `Failed` after being persisted on the document row; only
/// orchestration-level problems (missing document, repository outage)
/// surface as `IngestionError`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestionReport {
    /// Chunks already exist and no force flag was set.
    SkippedExisting,
    /// Another worker holds the processing claim.
    AlreadyProcessing,
    /// The document vanished or was reclaimed mid-run.
    Aborted,
    /// Terminal failure; `status = failed` and the reason persisted.
    Failed { reason: String },
    /// At least one chunk made it into the index.
    Completed { stored: usize, failed: usize },
}

#[derive(Debug, Clone, Copy)]
pub struct ThrottleConfig {
    /// Pause after this many embedding calls. Zero disables pausing.
    pub every_chunks: usize,
    pub pause: Duration,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            every_chunks: 4,
            pause: Duration::from_millis(200),
        }
    }
}

/// Orchestrates extraction, chunking, embedding, and persistence for one
/// document, and owns the status state machine. Tolerates partial chunk
/// failure: one bad chunk never aborts the rest of the document.
pub struct IngestionService {
    document_repository: Arc<dyn DocumentRepository>,
    chunk_repository: Arc<dyn ChunkRepository>,
    object_storage: Arc<dyn ObjectStorage>,
    extractor: Arc<dyn DocumentExtractor>,
    embedding_provider: Arc<dyn EmbeddingProvider>,
    chunker: TextChunker,
    throttle: ThrottleConfig,
}

impl IngestionService {
    pub fn new(
        document_repository: Arc<dyn DocumentRepository>,
        chunk_repository: Arc<dyn ChunkRepository>,
        object_storage: Arc<dyn ObjectStorage>,
        extractor: Arc<dyn DocumentExtractor>,
        embedding_provider: Arc<dyn EmbeddingProvider>,
        chunker: TextChunker,
        throttle: ThrottleConfig,
    ) -> Self {
        Self {
            document_repository,
            chunk_repository,
            object_storage,
            extractor,
            embedding_provider,
            chunker,
            throttle,
        }
    }

    pub async fn ingest(&self, request: IngestRequest) -> Result<IngestionReport, IngestionError> {
        let document_id = request.document_id;

        let document = self
            .document_repository
            .find_by_id(document_id)
            .await
            .map_err(|e| IngestionError::Repository(e.to_string()))?
            .ok_or(IngestionError::NotFound(document_id))?;

        // Idempotent skip: existing chunks mean the document is already
        // indexed, unless the caller forces a rebuild.
        if !request.force {
            let existing = self
                .chunk_repository
                .count_by_document(document_id)
                .await
                .map_err(|e| IngestionError::Repository(e.to_string()))?;
            if existing > 0 {
                tracing::info!(document = %document_id, chunks = existing, "already ingested, skipping");
                return Ok(IngestionReport::SkippedExisting);
            }
        }

        // Claim before any expensive work. A lost claim means a
        // concurrent run owns the document.
        let claimed = self
            .document_repository
            .try_claim_processing(document_id)
            .await
            .map_err(|e| IngestionError::Repository(e.to_string()))?;
        if !claimed {
            tracing::info!(document = %document_id, "claim lost, another worker is processing");
            return Ok(IngestionReport::AlreadyProcessing);
        }

        if request.force {
            let removed = self
                .chunk_repository
                .delete_by_document(document_id)
                .await
                .map_err(|e| IngestionError::Repository(e.to_string()))?;
            if removed > 0 {
                tracing::info!(document = %document_id, removed, "cleared existing chunks for reprocess");
            }
        }

        // Re-read under the claim so later updates carry current state.
        let Some(mut document) = self
            .document_repository
            .find_by_id(document_id)
            .await
            .map_err(|e| IngestionError::Repository(e.to_string()))?
        else {
            return Ok(IngestionReport::Aborted);
        };
        if !document.status().is_processing() {
            return Ok(IngestionReport::Aborted);
        }

        tracing::info!(document = %document_id, title = document.title(), "processing document");

        let bytes = match self.object_storage.get(document.storage_path()).await {
            Ok(bytes) => bytes,
            Err(error) => {
                return self
                    .fail(document_id, format!("failed to load stored file: {}", error))
                    .await;
            }
        };

        let extracted = match self.extractor.extract(&document, &bytes).await {
            Ok(extracted) => extracted,
            Err(error) => {
                return self.fail(document_id, format!("extraction failed: {}", error)).await;
            }
        };

        if let Some(metadata) = extracted.metadata.clone() {
            document.set_metadata(metadata);
            if let Err(error) = self.document_repository.update(&document).await {
                tracing::warn!(document = %document_id, error = %error, "failed to persist metadata");
            }
        }

        let chunk_texts = match self.chunker.split(&extracted.text) {
            Ok(chunks) => chunks,
            Err(_) => {
                return self.fail(document_id, "no valid chunks".to_string()).await;
            }
        };

        let (stored, failed) = self.embed_and_store(document_id, chunk_texts).await?;

        if stored == 0 {
            return self.fail(document_id, "all chunks failed".to_string()).await;
        }

        let warning = if failed > 0 {
            Some(format!("{} chunks failed to process", failed))
        } else {
            None
        };
        self.finish(document_id, DocumentStatus::Ready, warning).await?;

        tracing::info!(document = %document_id, stored, failed, "document ready");
        Ok(IngestionReport::Completed { stored, failed })
    }

    /// Sequential per-chunk embed + insert. Chunk indexes are assigned
    /// up front so ordering stays deterministic; failures are counted,
    /// logged, and skipped rather than aborting the run.
    async fn embed_and_store(
        &self,
        document_id: Uuid,
        chunk_texts: Vec<String>,
    ) -> Result<(usize, usize), IngestionError> {
        let mut limiter = RateLimiter::new(self.throttle.every_chunks, self.throttle.pause);
        let mut stored = 0usize;
        let mut failed = 0usize;

        for (index, text) in chunk_texts.into_iter().enumerate() {
            // The claim may have moved (deletion, concurrent reprocess);
            // stop before burning another provider call.
            if !self.still_claimed(document_id).await? {
                tracing::warn!(document = %document_id, "claim lost mid-run, stopping");
                return Ok((stored, failed));
            }

            let batch = [text];
            let embedded = self.embedding_provider.embed(&batch).await;
            match embedded {
                Ok(mut vectors) => match vectors.pop() {
                    Some(vector) => {
                        let [text] = batch;
                        let chunk = Chunk::new(document_id, index as i32, text, vector);
                        match self.chunk_repository.save(&chunk).await {
                            Ok(()) => stored += 1,
                            Err(error) => {
                                failed += 1;
                                tracing::warn!(
                                    document = %document_id,
                                    chunk_index = index,
                                    error = %error,
                                    "chunk insert failed"
                                );
                            }
                        }
                    }
                    None => {
                        failed += 1;
                        tracing::warn!(
                            document = %document_id,
                            chunk_index = index,
                            "embedding provider returned no vector"
                        );
                    }
                },
                Err(error) => {
                    // Failed chunks are excluded from the index, never
                    // replaced with placeholder vectors.
                    failed += 1;
                    tracing::warn!(
                        document = %document_id,
                        chunk_index = index,
                        error = %error,
                        "chunk embedding failed"
                    );
                }
            }

            limiter.permit().await;
        }

        Ok((stored, failed))
    }

    async fn still_claimed(&self, document_id: Uuid) -> Result<bool, IngestionError> {
        let current = self
            .document_repository
            .find_by_id(document_id)
            .await
            .map_err(|e| IngestionError::Repository(e.to_string()))?;
        Ok(current.is_some_and(|d| d.status().is_processing()))
    }

    async fn fail(
        &self,
        document_id: Uuid,
        reason: String,
    ) -> Result<IngestionReport, IngestionError> {
        tracing::warn!(document = %document_id, reason = %reason, "document failed");
        self.finish(document_id, DocumentStatus::Failed, Some(reason.clone()))
            .await?;
        Ok(IngestionReport::Failed { reason })
    }

    async fn finish(
        &self,
        document_id: Uuid,
        status: DocumentStatus,
        error: Option<String>,
    ) -> Result<(), IngestionError> {
        // Guard the transition: a document deleted or reclaimed since
        // the last check must not be clobbered from here.
        match self.document_repository.find_by_id(document_id).await {
            Ok(Some(current)) if current.status().can_transition_to(status) => self
                .document_repository
                .set_status(document_id, status, error)
                .await
                .map_err(|e| IngestionError::Repository(e.to_string())),
            Ok(_) => {
                tracing::warn!(document = %document_id, status = %status, "skipping stale status write");
                Ok(())
            }
            Err(e) => Err(IngestionError::Repository(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::document_extractor::{ExtractedDocument, ExtractionError};
    use crate::application::ports::embedding_provider::EmbeddingError;
    use crate::application::ports::object_storage::StorageError;
    use crate::application::services::chunker::ChunkerConfig;
    use crate::domain::repositories::chunk_repository::{ChunkRepositoryError, RankedChunk};
    use crate::domain::repositories::document_repository::DocumentRepositoryError;
    use crate::domain::value_objects::DocumentMetadata;
    use async_trait::async_trait;
    use pgvector::Vector;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct FakeDocuments {
        rows: Mutex<HashMap<Uuid, Document>>,
    }

    impl FakeDocuments {
        fn with(document: Document) -> Arc<Self> {
            let mut rows = HashMap::new();
            rows.insert(document.id(), document);
            Arc::new(Self {
                rows: Mutex::new(rows),
            })
        }

        fn status_of(&self, id: Uuid) -> (DocumentStatus, Option<String>) {
            let rows = self.rows.lock().unwrap();
            let document = rows.get(&id).unwrap();
            (document.status(), document.error().map(|s| s.to_string()))
        }
    }

    #[async_trait]
    impl DocumentRepository for FakeDocuments {
        async fn save(&self, document: &Document) -> Result<(), DocumentRepositoryError> {
            self.rows
                .lock()
                .unwrap()
                .insert(document.id(), document.clone());
            Ok(())
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<Document>, DocumentRepositoryError> {
            Ok(self.rows.lock().unwrap().get(&id).cloned())
        }

        async fn list(&self, _skip: i64, _limit: i64) -> Result<Vec<Document>, DocumentRepositoryError> {
            Ok(self.rows.lock().unwrap().values().cloned().collect())
        }

        async fn count(&self) -> Result<i64, DocumentRepositoryError> {
            Ok(self.rows.lock().unwrap().len() as i64)
        }

        async fn update(&self, document: &Document) -> Result<(), DocumentRepositoryError> {
            self.rows
                .lock()
                .unwrap()
                .insert(document.id(), document.clone());
            Ok(())
        }

        async fn try_claim_processing(&self, id: Uuid) -> Result<bool, DocumentRepositoryError> {
            let mut rows = self.rows.lock().unwrap();
            let Some(document) = rows.get(&id) else {
                return Ok(false);
            };
            if document.status().is_processing() {
                return Ok(false);
            }
            let claimed = Document::restore(
                document.id(),
                document.title().to_string(),
                document.storage_path().to_string(),
                document.workspace_id(),
                document.owner_id(),
                DocumentStatus::Processing,
                None,
                document.metadata().cloned(),
                document.checksum().map(|s| s.to_string()),
                document.created_at(),
                chrono::Utc::now(),
            );
            rows.insert(id, claimed);
            Ok(true)
        }

        async fn set_status(
            &self,
            id: Uuid,
            status: DocumentStatus,
            error: Option<String>,
        ) -> Result<(), DocumentRepositoryError> {
            let mut rows = self.rows.lock().unwrap();
            let document = rows.get(&id).ok_or(DocumentRepositoryError::NotFound(id))?;
            let updated = Document::restore(
                document.id(),
                document.title().to_string(),
                document.storage_path().to_string(),
                document.workspace_id(),
                document.owner_id(),
                status,
                error,
                document.metadata().cloned(),
                document.checksum().map(|s| s.to_string()),
                document.created_at(),
                chrono::Utc::now(),
            );
            rows.insert(id, updated);
            Ok(())
        }

        async fn delete(&self, id: Uuid) -> Result<bool, DocumentRepositoryError> {
            Ok(self.rows.lock().unwrap().remove(&id).is_some())
        }
    }

    #[derive(Default)]
    struct FakeChunks {
        rows: Mutex<Vec<Chunk>>,
    }

    #[async_trait]
    impl ChunkRepository for FakeChunks {
        async fn save(&self, chunk: &Chunk) -> Result<(), ChunkRepositoryError> {
            self.rows.lock().unwrap().push(chunk.clone());
            Ok(())
        }

        async fn count_by_document(&self, document_id: Uuid) -> Result<i64, ChunkRepositoryError> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .filter(|c| c.document_id() == document_id)
                .count() as i64)
        }

        async fn delete_by_document(&self, document_id: Uuid) -> Result<i64, ChunkRepositoryError> {
            let mut rows = self.rows.lock().unwrap();
            let before = rows.len();
            rows.retain(|c| c.document_id() != document_id);
            Ok((before - rows.len()) as i64)
        }

        async fn search_similar(
            &self,
            _workspace_id: Uuid,
            _query: &Vector,
            _limit: i64,
        ) -> Result<Vec<RankedChunk>, ChunkRepositoryError> {
            Ok(Vec::new())
        }

        async fn first_in_workspace(
            &self,
            _workspace_id: Uuid,
            _limit: i64,
        ) -> Result<Vec<RankedChunk>, ChunkRepositoryError> {
            Ok(Vec::new())
        }
    }

    #[derive(Default)]
    struct FakeStorage {
        objects: Mutex<HashMap<String, Vec<u8>>>,
    }

    #[async_trait]
    impl ObjectStorage for FakeStorage {
        async fn get(&self, path: &str) -> Result<Vec<u8>, StorageError> {
            self.objects
                .lock()
                .unwrap()
                .get(path)
                .cloned()
                .ok_or_else(|| StorageError::NotFound(path.to_string()))
        }

        async fn put(&self, path: &str, bytes: &[u8]) -> Result<(), StorageError> {
            self.objects
                .lock()
                .unwrap()
                .insert(path.to_string(), bytes.to_vec());
            Ok(())
        }

        async fn delete(&self, path: &str) -> Result<bool, StorageError> {
            Ok(self.objects.lock().unwrap().remove(path).is_some())
        }

        async fn list(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
            Ok(self
                .objects
                .lock()
                .unwrap()
                .keys()
                .filter(|k| k.starts_with(prefix))
                .cloned()
                .collect())
        }
    }

    struct FakeExtractor {
        result: Result<String, String>,
    }

    #[async_trait]
    impl DocumentExtractor for FakeExtractor {
        async fn extract(
            &self,
            _document: &Document,
            _bytes: &[u8],
        ) -> Result<ExtractedDocument, ExtractionError> {
            match &self.result {
                Ok(text) => Ok(ExtractedDocument {
                    text: text.clone(),
                    metadata: Some(DocumentMetadata {
                        title: Some("Extracted".to_string()),
                        ..Default::default()
                    }),
                    page_count: Some(1),
                }),
                Err(_) => Err(ExtractionError::EmptyDocument),
            }
        }
    }

    /// Embeds everything except texts containing "xfailx".
    struct MarkerEmbedder;

    #[async_trait]
    impl EmbeddingProvider for MarkerEmbedder {
        async fn embed(&self, texts: &[String]) -> Result<Vec<Vector>, EmbeddingError> {
            if texts.iter().any(|t| t.contains("xfailx")) {
                return Err(EmbeddingError::Provider("marked text".to_string()));
            }
            Ok(texts.iter().map(|_| Vector::from(vec![0.0; 4])).collect())
        }

        fn dimension(&self) -> usize {
            4
        }
    }

    fn test_document() -> Document {
        Document::create(
            "report.txt".to_string(),
            Uuid::new_v4(),
            Uuid::new_v4(),
            "txt",
        )
    }

    fn sentence(index: usize, marked: bool) -> String {
        if marked {
            format!("xfailx{:043}.", index)
        } else {
            format!("{:049}.", index)
        }
    }

    fn ten_sentences(marked: &[usize]) -> String {
        (0..10)
            .map(|i| sentence(i, marked.contains(&i)))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn service(
        documents: Arc<FakeDocuments>,
        chunks: Arc<FakeChunks>,
        storage: Arc<FakeStorage>,
        extracted: Result<String, String>,
    ) -> IngestionService {
        IngestionService::new(
            documents,
            chunks,
            storage,
            Arc::new(FakeExtractor { result: extracted }),
            Arc::new(MarkerEmbedder),
            TextChunker::new(ChunkerConfig {
                max_chunk_size: 60,
                overlap: 0,
                min_chunk_size: 5,
            }),
            ThrottleConfig {
                every_chunks: 0,
                pause: Duration::from_millis(0),
            },
        )
    }

    async fn seed(documents: &FakeDocuments, storage: &FakeStorage, document: &Document) {
        documents.save(document).await.unwrap();
        storage
            .put(document.storage_path(), b"raw bytes")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn successful_ingestion_reaches_ready() {
        let document = test_document();
        let documents = FakeDocuments::with(document.clone());
        let chunks = Arc::new(FakeChunks::default());
        let storage = Arc::new(FakeStorage::default());
        seed(&documents, &storage, &document).await;

        let svc = service(
            documents.clone(),
            chunks.clone(),
            storage,
            Ok(ten_sentences(&[])),
        );
        let report = svc
            .ingest(IngestRequest {
                document_id: document.id(),
                force: false,
            })
            .await
            .unwrap();

        assert_eq!(report, IngestionReport::Completed { stored: 10, failed: 0 });
        let (status, error) = documents.status_of(document.id());
        assert_eq!(status, DocumentStatus::Ready);
        assert!(error.is_none());

        // Chunk indexes are dense and ordered.
        let stored = chunks.rows.lock().unwrap();
        let mut indexes: Vec<i32> = stored.iter().map(|c| c.chunk_index()).collect();
        indexes.sort_unstable();
        assert_eq!(indexes, (0..10).collect::<Vec<i32>>());
        for chunk in stored.iter() {
            assert_eq!(chunk.dimension(), 4);
        }
    }

    #[tokio::test]
    async fn reingestion_without_force_writes_nothing() {
        let document = test_document();
        let documents = FakeDocuments::with(document.clone());
        let chunks = Arc::new(FakeChunks::default());
        let storage = Arc::new(FakeStorage::default());
        seed(&documents, &storage, &document).await;
        chunks
            .save(&Chunk::new(
                document.id(),
                0,
                "existing".to_string(),
                Vector::from(vec![0.0; 4]),
            ))
            .await
            .unwrap();

        let svc = service(
            documents.clone(),
            chunks.clone(),
            storage,
            Ok(ten_sentences(&[])),
        );
        let report = svc
            .ingest(IngestRequest {
                document_id: document.id(),
                force: false,
            })
            .await
            .unwrap();

        assert_eq!(report, IngestionReport::SkippedExisting);
        assert_eq!(chunks.rows.lock().unwrap().len(), 1);
        // Status untouched by the skip.
        let (status, _) = documents.status_of(document.id());
        assert_eq!(status, DocumentStatus::Uploading);
    }

    #[tokio::test]
    async fn force_reprocess_replaces_existing_chunks() {
        let document = test_document();
        let documents = FakeDocuments::with(document.clone());
        let chunks = Arc::new(FakeChunks::default());
        let storage = Arc::new(FakeStorage::default());
        seed(&documents, &storage, &document).await;
        documents
            .set_status(document.id(), DocumentStatus::Ready, None)
            .await
            .unwrap();
        chunks
            .save(&Chunk::new(
                document.id(),
                0,
                "stale".to_string(),
                Vector::from(vec![0.0; 4]),
            ))
            .await
            .unwrap();

        let svc = service(
            documents.clone(),
            chunks.clone(),
            storage,
            Ok(ten_sentences(&[])),
        );
        let report = svc
            .ingest(IngestRequest {
                document_id: document.id(),
                force: true,
            })
            .await
            .unwrap();

        assert_eq!(report, IngestionReport::Completed { stored: 10, failed: 0 });
        let stored = chunks.rows.lock().unwrap();
        assert_eq!(stored.len(), 10);
        assert!(stored.iter().all(|c| c.chunk_text() != "stale"));
    }

    #[tokio::test]
    async fn documents_already_processing_are_skipped() {
        let document = test_document();
        let documents = FakeDocuments::with(document.clone());
        let chunks = Arc::new(FakeChunks::default());
        let storage = Arc::new(FakeStorage::default());
        seed(&documents, &storage, &document).await;
        documents.try_claim_processing(document.id()).await.unwrap();

        let svc = service(
            documents.clone(),
            chunks.clone(),
            storage,
            Ok(ten_sentences(&[])),
        );
        let report = svc
            .ingest(IngestRequest {
                document_id: document.id(),
                force: false,
            })
            .await
            .unwrap();

        assert_eq!(report, IngestionReport::AlreadyProcessing);
        assert!(chunks.rows.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn extraction_failure_is_terminal_with_no_chunks() {
        let document = test_document();
        let documents = FakeDocuments::with(document.clone());
        let chunks = Arc::new(FakeChunks::default());
        let storage = Arc::new(FakeStorage::default());
        seed(&documents, &storage, &document).await;

        let svc = service(
            documents.clone(),
            chunks.clone(),
            storage,
            Err("empty".to_string()),
        );
        let report = svc
            .ingest(IngestRequest {
                document_id: document.id(),
                force: false,
            })
            .await
            .unwrap();

        assert!(matches!(report, IngestionReport::Failed { .. }));
        let (status, error) = documents.status_of(document.id());
        assert_eq!(status, DocumentStatus::Failed);
        assert!(error.unwrap().contains("extraction failed"));
        assert!(chunks.rows.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_stored_object_fails_the_document() {
        let document = test_document();
        let documents = FakeDocuments::with(document.clone());
        let chunks = Arc::new(FakeChunks::default());
        // Storage intentionally left empty.
        let storage = Arc::new(FakeStorage::default());

        let svc = service(
            documents.clone(),
            chunks.clone(),
            storage,
            Ok(ten_sentences(&[])),
        );
        let report = svc
            .ingest(IngestRequest {
                document_id: document.id(),
                force: false,
            })
            .await
            .unwrap();

        assert!(matches!(report, IngestionReport::Failed { .. }));
        let (status, error) = documents.status_of(document.id());
        assert_eq!(status, DocumentStatus::Failed);
        assert!(error.unwrap().contains("failed to load stored file"));
    }

    #[tokio::test]
    async fn partial_embedding_failure_still_reaches_ready() {
        let document = test_document();
        let documents = FakeDocuments::with(document.clone());
        let chunks = Arc::new(FakeChunks::default());
        let storage = Arc::new(FakeStorage::default());
        seed(&documents, &storage, &document).await;

        let svc = service(
            documents.clone(),
            chunks.clone(),
            storage,
            Ok(ten_sentences(&[3, 7])),
        );
        let report = svc
            .ingest(IngestRequest {
                document_id: document.id(),
                force: false,
            })
            .await
            .unwrap();

        assert_eq!(report, IngestionReport::Completed { stored: 8, failed: 2 });
        assert_eq!(chunks.rows.lock().unwrap().len(), 8);
        let (status, error) = documents.status_of(document.id());
        assert_eq!(status, DocumentStatus::Ready);
        assert!(error.unwrap().contains("2 chunks failed to process"));
    }

    #[tokio::test]
    async fn all_chunks_failing_fails_the_document() {
        let document = test_document();
        let documents = FakeDocuments::with(document.clone());
        let chunks = Arc::new(FakeChunks::default());
        let storage = Arc::new(FakeStorage::default());
        seed(&documents, &storage, &document).await;

        let svc = service(
            documents.clone(),
            chunks.clone(),
            storage,
            Ok(ten_sentences(&(0..10).collect::<Vec<_>>())),
        );
        let report = svc
            .ingest(IngestRequest {
                document_id: document.id(),
                force: false,
            })
            .await
            .unwrap();

        assert!(matches!(report, IngestionReport::Failed { .. }));
        let (status, error) = documents.status_of(document.id());
        assert_eq!(status, DocumentStatus::Failed);
        assert_eq!(error.as_deref(), Some("all chunks failed"));
        assert!(chunks.rows.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_document_is_an_orchestration_error() {
        let documents = FakeDocuments::with(test_document());
        let svc = service(
            documents,
            Arc::new(FakeChunks::default()),
            Arc::new(FakeStorage::default()),
            Ok(String::new()),
        );

        let result = svc
            .ingest(IngestRequest {
                document_id: Uuid::new_v4(),
                force: false,
            })
            .await;
        assert!(matches!(result, Err(IngestionError::NotFound(_))));
    }
}
