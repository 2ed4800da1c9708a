use std::time::Duration;

use async_trait::async_trait;
use pgvector::Vector;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::application::ports::embedding_provider::{EmbeddingError, EmbeddingProvider};

#[derive(Debug, Clone)]
pub struct EmbeddingsClientConfig {
    pub service_url: String,
    pub dimension: usize,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub backoff_factor: f64,
}

impl EmbeddingsClientConfig {
    pub fn new(service_url: String, dimension: usize) -> Self {
        Self {
            service_url,
            dimension,
            timeout_secs: 30,
            max_retries: 3,
            backoff_factor: 1.5,
        }
    }
}

#[derive(Debug, Serialize)]
struct EmbedRequestBody<'a> {
    texts: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbedResponseBody {
    embeddings: Vec<Vector>,
}

/// HTTP embedding provider. Transient failures are retried with
/// exponential backoff; every response is validated for count and
/// dimensionality before it reaches the index.
#[derive(Debug, Clone)]
pub struct HttpEmbeddingProvider {
    client: Client,
    config: EmbeddingsClientConfig,
}

impl HttpEmbeddingProvider {
    pub fn new(config: EmbeddingsClientConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    async fn send_with_retries(&self, texts: &[String]) -> Result<Vec<Vector>, EmbeddingError> {
        let mut attempts = 0;
        let mut last_error: Option<EmbeddingError> = None;

        loop {
            attempts += 1;

            match self.execute(texts).await {
                Ok(vectors) => return Ok(vectors),
                Err(error) => {
                    last_error = Some(error);
                    if attempts > self.config.max_retries {
                        break;
                    }
                    let backoff = Duration::from_millis(
                        (self.config.backoff_factor.powi(attempts as i32 - 1) * 1000.0) as u64,
                    );
                    tokio::time::sleep(backoff).await;
                }
            }
        }

        Err(EmbeddingError::RetriesExhausted(
            last_error.map(|e| e.to_string()).unwrap_or_default(),
        ))
    }

    async fn execute(&self, texts: &[String]) -> Result<Vec<Vector>, EmbeddingError> {
        let response = self
            .client
            .post(&self.config.service_url)
            .json(&EmbedRequestBody { texts })
            .send()
            .await
            .map_err(|e| EmbeddingError::Network(e.without_url().to_string()))?;

        if !response.status().is_success() {
            return Err(EmbeddingError::Provider(format!(
                "embedding service returned {}",
                response.status()
            )));
        }

        let body: EmbedResponseBody = response
            .json()
            .await
            .map_err(|e| EmbeddingError::Provider(e.without_url().to_string()))?;

        Ok(body.embeddings)
    }
}

/// Reject short, long, or wrongly sized responses before they can
/// corrupt similarity ranking.
fn validate_vectors(
    vectors: Vec<Vector>,
    sent: usize,
    dimension: usize,
) -> Result<Vec<Vector>, EmbeddingError> {
    if vectors.len() != sent {
        return Err(EmbeddingError::CountMismatch {
            sent,
            received: vectors.len(),
        });
    }
    for vector in &vectors {
        let actual = vector.as_slice().len();
        if actual != dimension {
            return Err(EmbeddingError::DimensionMismatch {
                expected: dimension,
                actual,
            });
        }
    }
    Ok(vectors)
}

#[async_trait]
impl EmbeddingProvider for HttpEmbeddingProvider {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vector>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let vectors = self.send_with_retries(texts).await?;
        validate_vectors(vectors, texts.len(), self.config.dimension)
    }

    fn dimension(&self) -> usize {
        self.config.dimension
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_serializes_texts_in_order() {
        let texts = vec!["first".to_string(), "second".to_string()];
        let body = serde_json::to_value(EmbedRequestBody { texts: &texts }).unwrap();
        assert_eq!(body["texts"][0], "first");
        assert_eq!(body["texts"][1], "second");
    }

    #[test]
    fn response_vectors_must_match_the_configured_dimension() {
        let vectors = vec![Vector::from(vec![1.0, 2.0, 3.0])];
        let result = validate_vectors(vectors, 1, 4);
        assert!(matches!(
            result,
            Err(EmbeddingError::DimensionMismatch { expected: 4, actual: 3 })
        ));
    }

    #[test]
    fn response_count_must_match_the_request() {
        let vectors = vec![Vector::from(vec![0.0; 4])];
        let result = validate_vectors(vectors, 2, 4);
        assert!(matches!(
            result,
            Err(EmbeddingError::CountMismatch { sent: 2, received: 1 })
        ));
    }

    #[test]
    fn valid_vectors_pass_through_unchanged() {
        let vectors = vec![Vector::from(vec![0.0; 4]), Vector::from(vec![1.0; 4])];
        let validated = validate_vectors(vectors.clone(), 2, 4).unwrap();
        assert_eq!(validated, vectors);
    }
}
