use std::sync::Arc;

use uuid::Uuid;

use crate::application::ports::generation_provider::GenerationProvider;
use crate::application::services::answering::AnswerService;
use crate::application::services::retrieval::{RetrievalService, DEFAULT_TOP_K};
use crate::domain::entities::{Answer, AnswerMode, QueryRecord};
use crate::domain::repositories::QueryRepository;

#[derive(Debug, Clone)]
pub struct AskRequest {
    pub workspace_id: Uuid,
    pub user_id: Uuid,
    pub question: String,
    pub top_k: Option<usize>,
    pub mode: Option<AnswerMode>,
}

/// The question-answering surface: log the query, retrieve, answer.
/// This never returns an error to its caller; retrieval and generation
/// failures are folded into a degraded success payload.
pub struct AskService {
    retrieval: Arc<RetrievalService>,
    answering: Arc<AnswerService>,
    query_repository: Arc<dyn QueryRepository>,
    generation_provider: Arc<dyn GenerationProvider>,
}

impl AskService {
    pub fn new(
        retrieval: Arc<RetrievalService>,
        answering: Arc<AnswerService>,
        query_repository: Arc<dyn QueryRepository>,
        generation_provider: Arc<dyn GenerationProvider>,
    ) -> Self {
        Self {
            retrieval,
            answering,
            query_repository,
            generation_provider,
        }
    }

    pub async fn ask(&self, request: AskRequest) -> Answer {
        let record = QueryRecord::new(
            request.workspace_id,
            request.user_id,
            request.question.clone(),
            self.generation_provider.model_name().to_string(),
        );
        if let Err(error) = self.query_repository.record(&record).await {
            // The query log is observability, not a gate on answering.
            tracing::warn!(error = %error, "failed to record query");
        }

        let top_k = request.top_k.unwrap_or(DEFAULT_TOP_K);
        let context = match self
            .retrieval
            .retrieve(request.workspace_id, &request.question, top_k)
            .await
        {
            Ok(context) => context,
            Err(error) => {
                tracing::warn!(
                    workspace = %request.workspace_id,
                    error = %error,
                    "retrieval failed, answering without context"
                );
                return Answer {
                    text: "I couldn't search your documents just now. Please try again."
                        .to_string(),
                    mode: request.mode.unwrap_or(AnswerMode::Grounded),
                    citations: Vec::new(),
                    insufficient_context: true,
                    degraded: true,
                    failure: Some(error.to_string()),
                };
            }
        };

        self.answering
            .answer(&request.question, &context, request.mode)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::embedding_provider::{EmbeddingError, EmbeddingProvider};
    use crate::application::ports::generation_provider::{ChatMessage, GenerationError};
    use crate::domain::entities::Chunk;
    use crate::domain::repositories::chunk_repository::{
        ChunkRepository, ChunkRepositoryError, RankedChunk,
    };
    use crate::domain::repositories::query_repository::QueryRepositoryError;
    use async_trait::async_trait;
    use pgvector::Vector;
    use std::sync::Mutex;

    struct FakeEmbedder;

    #[async_trait]
    impl EmbeddingProvider for FakeEmbedder {
        async fn embed(&self, texts: &[String]) -> Result<Vec<Vector>, EmbeddingError> {
            Ok(texts.iter().map(|_| Vector::from(vec![1.0, 0.0])).collect())
        }

        fn dimension(&self) -> usize {
            2
        }
    }

    struct BrokenEmbedder;

    #[async_trait]
    impl EmbeddingProvider for BrokenEmbedder {
        async fn embed(&self, _texts: &[String]) -> Result<Vec<Vector>, EmbeddingError> {
            Err(EmbeddingError::Provider("offline".to_string()))
        }

        fn dimension(&self) -> usize {
            2
        }
    }

    struct FakeChunks {
        rows: Vec<RankedChunk>,
    }

    #[async_trait]
    impl ChunkRepository for FakeChunks {
        async fn save(&self, _chunk: &Chunk) -> Result<(), ChunkRepositoryError> {
            Ok(())
        }

        async fn count_by_document(&self, _document_id: Uuid) -> Result<i64, ChunkRepositoryError> {
            Ok(self.rows.len() as i64)
        }

        async fn delete_by_document(&self, _document_id: Uuid) -> Result<i64, ChunkRepositoryError> {
            Ok(0)
        }

        async fn search_similar(
            &self,
            _workspace_id: Uuid,
            _query: &Vector,
            _limit: i64,
        ) -> Result<Vec<RankedChunk>, ChunkRepositoryError> {
            Ok(self.rows.clone())
        }

        async fn first_in_workspace(
            &self,
            _workspace_id: Uuid,
            _limit: i64,
        ) -> Result<Vec<RankedChunk>, ChunkRepositoryError> {
            Ok(self.rows.clone())
        }
    }

    struct FakeQueries {
        recorded: Mutex<Vec<QueryRecord>>,
    }

    #[async_trait]
    impl QueryRepository for FakeQueries {
        async fn record(&self, query: &QueryRecord) -> Result<(), QueryRepositoryError> {
            self.recorded.lock().unwrap().push(query.clone());
            Ok(())
        }
    }

    struct EchoProvider;

    #[async_trait]
    impl GenerationProvider for EchoProvider {
        async fn complete(
            &self,
            _messages: &[ChatMessage],
            _temperature: f32,
            _max_tokens: u32,
        ) -> Result<String, GenerationError> {
            Ok("an answer".to_string())
        }

        fn model_name(&self) -> &str {
            "echo-1"
        }
    }

    fn service_with(
        embedder: Arc<dyn EmbeddingProvider>,
        rows: Vec<RankedChunk>,
        queries: Arc<FakeQueries>,
    ) -> AskService {
        let generation: Arc<dyn GenerationProvider> = Arc::new(EchoProvider);
        AskService::new(
            Arc::new(RetrievalService::new(embedder, Arc::new(FakeChunks { rows }))),
            Arc::new(AnswerService::new(generation.clone(), 512)),
            queries,
            generation,
        )
    }

    #[tokio::test]
    async fn empty_workspace_answers_softly_with_no_citations() {
        let queries = Arc::new(FakeQueries {
            recorded: Mutex::new(Vec::new()),
        });
        let service = service_with(Arc::new(FakeEmbedder), Vec::new(), queries.clone());

        let answer = service
            .ask(AskRequest {
                workspace_id: Uuid::new_v4(),
                user_id: Uuid::new_v4(),
                question: "what do my documents say?".to_string(),
                top_k: None,
                mode: None,
            })
            .await;

        assert!(answer.insufficient_context);
        assert!(answer.citations.is_empty());
        assert!(answer.failure.is_none());
        assert_eq!(queries.recorded.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn query_is_recorded_with_the_generation_model() {
        let queries = Arc::new(FakeQueries {
            recorded: Mutex::new(Vec::new()),
        });
        let service = service_with(Arc::new(FakeEmbedder), Vec::new(), queries.clone());

        service
            .ask(AskRequest {
                workspace_id: Uuid::new_v4(),
                user_id: Uuid::new_v4(),
                question: "hello".to_string(),
                top_k: None,
                mode: None,
            })
            .await;

        let recorded = queries.recorded.lock().unwrap();
        assert_eq!(recorded[0].question_text(), "hello");
        assert_eq!(recorded[0].model_used(), "echo-1");
    }

    #[tokio::test]
    async fn retrieval_failure_degrades_instead_of_erroring() {
        let queries = Arc::new(FakeQueries {
            recorded: Mutex::new(Vec::new()),
        });
        let service = service_with(Arc::new(BrokenEmbedder), Vec::new(), queries.clone());

        let answer = service
            .ask(AskRequest {
                workspace_id: Uuid::new_v4(),
                user_id: Uuid::new_v4(),
                question: "anything?".to_string(),
                top_k: None,
                mode: None,
            })
            .await;

        assert!(answer.degraded);
        assert!(answer.failure.is_some());
        assert!(answer.citations.is_empty());
        // The question was still logged.
        assert_eq!(queries.recorded.lock().unwrap().len(), 1);
    }
}
