use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::application::ports::generation_provider::{
    ChatMessage, GenerationError, GenerationProvider,
};

#[derive(Debug, Clone)]
pub struct GenerationClientConfig {
    pub service_url: String,
    pub model: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub backoff_factor: f64,
}

impl GenerationClientConfig {
    pub fn new(service_url: String, model: String) -> Self {
        Self {
            service_url,
            model,
            timeout_secs: 60,
            max_retries: 2,
            backoff_factor: 1.5,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequestBody<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponseBody {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

/// Chat-completion client for an OpenAI-compatible endpoint.
#[derive(Debug, Clone)]
pub struct HttpGenerationProvider {
    client: Client,
    config: GenerationClientConfig,
}

impl HttpGenerationProvider {
    pub fn new(config: GenerationClientConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    async fn execute(
        &self,
        messages: &[ChatMessage],
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String, GenerationError> {
        let body = ChatRequestBody {
            model: &self.config.model,
            messages,
            temperature,
            max_tokens,
        };

        let response = self
            .client
            .post(&self.config.service_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerationError::Network(e.without_url().to_string()))?;

        if !response.status().is_success() {
            return Err(GenerationError::Provider(format!(
                "generation service returned {}",
                response.status()
            )));
        }

        let parsed: ChatResponseBody = response
            .json()
            .await
            .map_err(|e| GenerationError::Provider(e.without_url().to_string()))?;

        let text = parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .unwrap_or_default();
        if text.trim().is_empty() {
            return Err(GenerationError::EmptyCompletion);
        }
        Ok(text)
    }
}

#[async_trait]
impl GenerationProvider for HttpGenerationProvider {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String, GenerationError> {
        let mut attempts = 0;
        let mut last_error: Option<GenerationError> = None;

        loop {
            attempts += 1;

            match self.execute(messages, temperature, max_tokens).await {
                Ok(text) => return Ok(text),
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

        Err(GenerationError::RetriesExhausted(
            last_error.map(|e| e.to_string()).unwrap_or_default(),
        ))
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}
