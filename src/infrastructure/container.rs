use std::path::PathBuf;
use std::sync::Arc;

use crate::application::ports::{
    DocumentExtractor, EmbeddingProvider, GenerationProvider, IngestQueue, ObjectStorage,
    OcrEngine,
};
use crate::application::services::{
    AnswerService, AskService, ChunkerConfig, IngestionService, RetrievalService, TextChunker,
    ThrottleConfig,
};
use crate::domain::repositories::{ChunkRepository, DocumentRepository, QueryRepository};
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::database::{
    create_connection_pool, get_connection_from_pool,
    repositories::{PostgresChunkRepository, PostgresDocumentRepository, PostgresQueryRepository},
    run_migrations,
};
use crate::infrastructure::external_services::{
    EmbeddingsClientConfig, GenerationClientConfig, HttpEmbeddingProvider, HttpGenerationProvider,
    HttpOcrEngine, OcrClientConfig,
};
use crate::infrastructure::extractors::{CompositeExtractor, PdfOcrExtractor};
use crate::infrastructure::file_system::LocalObjectStorage;
use crate::infrastructure::messaging::{BackgroundProcessor, MpscIngestQueue};
use crate::presentation::http::handlers::{AskHandler, DocumentHandler};

/// Builds and wires every component once at startup. All collaborators
/// are injected as trait objects, so tests substitute any of them.
pub struct AppContainer {
    pub document_repository: Arc<dyn DocumentRepository>,
    pub chunk_repository: Arc<dyn ChunkRepository>,
    pub query_repository: Arc<dyn QueryRepository>,

    pub object_storage: Arc<dyn ObjectStorage>,
    pub embedding_provider: Arc<dyn EmbeddingProvider>,
    pub generation_provider: Arc<dyn GenerationProvider>,
    pub ocr_engine: Arc<dyn OcrEngine>,
    pub document_extractor: Arc<dyn DocumentExtractor>,

    pub ingest_queue: Arc<dyn IngestQueue>,
    pub background_processor: Arc<BackgroundProcessor>,

    pub ingestion_service: Arc<IngestionService>,
    pub retrieval_service: Arc<RetrievalService>,
    pub answer_service: Arc<AnswerService>,
    pub ask_service: Arc<AskService>,

    pub document_handler: Arc<DocumentHandler>,
    pub ask_handler: Arc<AskHandler>,
}

impl AppContainer {
    pub fn new(config: &AppConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let db_pool = create_connection_pool(&config.database_url)?;
        {
            let mut conn = get_connection_from_pool(&db_pool)?;
            run_migrations(&mut conn)?;
        }

        let document_repository: Arc<dyn DocumentRepository> =
            Arc::new(PostgresDocumentRepository::new(db_pool.clone()));
        let chunk_repository: Arc<dyn ChunkRepository> =
            Arc::new(PostgresChunkRepository::new(db_pool.clone()));
        let query_repository: Arc<dyn QueryRepository> =
            Arc::new(PostgresQueryRepository::new(db_pool));

        let object_storage: Arc<dyn ObjectStorage> = Arc::new(LocalObjectStorage::new(
            PathBuf::from(&config.storage_root),
        ));

        let embedding_provider: Arc<dyn EmbeddingProvider> =
            Arc::new(HttpEmbeddingProvider::new(EmbeddingsClientConfig::new(
                config.embeddings_service_url.clone(),
                config.embedding_dimension,
            ))?);

        let generation_provider: Arc<dyn GenerationProvider> =
            Arc::new(HttpGenerationProvider::new(GenerationClientConfig::new(
                config.generation_service_url.clone(),
                config.generation_model.clone(),
            ))?);

        let ocr_engine: Arc<dyn OcrEngine> = Arc::new(HttpOcrEngine::new(OcrClientConfig::new(
            config.ocr_service_url.clone(),
            config.ocr_render_scale,
            config.ocr_max_concurrent,
        ))?);

        let pdf_extractor = Arc::new(PdfOcrExtractor::new(
            ocr_engine.clone(),
            object_storage.clone(),
        )?);
        let document_extractor: Arc<dyn DocumentExtractor> =
            Arc::new(CompositeExtractor::new(pdf_extractor));

        let chunker = TextChunker::new(ChunkerConfig {
            max_chunk_size: config.chunk_max_size,
            overlap: config.chunk_overlap,
            min_chunk_size: config.chunk_min_size,
        });

        let ingestion_service = Arc::new(IngestionService::new(
            document_repository.clone(),
            chunk_repository.clone(),
            object_storage.clone(),
            document_extractor.clone(),
            embedding_provider.clone(),
            chunker,
            ThrottleConfig {
                every_chunks: config.throttle_every_chunks,
                pause: config.throttle_pause,
            },
        ));

        let retrieval_service = Arc::new(RetrievalService::new(
            embedding_provider.clone(),
            chunk_repository.clone(),
        ));

        let answer_service = Arc::new(AnswerService::new(
            generation_provider.clone(),
            config.answer_max_tokens,
        ));

        let ask_service = Arc::new(AskService::new(
            retrieval_service.clone(),
            answer_service.clone(),
            query_repository.clone(),
            generation_provider.clone(),
        ));

        let (ingest_queue, ingest_receiver) = MpscIngestQueue::create_pair();
        let ingest_queue: Arc<dyn IngestQueue> = Arc::new(ingest_queue);
        let background_processor = Arc::new(
            BackgroundProcessor::new(Arc::new(ingest_receiver), ingestion_service.clone())
                .with_worker_count(config.ingest_workers),
        );

        let document_handler = Arc::new(DocumentHandler::new(
            document_repository.clone(),
            chunk_repository.clone(),
            object_storage.clone(),
            ingest_queue.clone(),
        ));
        let ask_handler = Arc::new(AskHandler::new(ask_service.clone()));

        Ok(Self {
            document_repository,
            chunk_repository,
            query_repository,
            object_storage,
            embedding_provider,
            generation_provider,
            ocr_engine,
            document_extractor,
            ingest_queue,
            background_processor,
            ingestion_service,
            retrieval_service,
            answer_service,
            ask_service,
            document_handler,
            ask_handler,
        })
    }
}
