use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::application::ports::ocr_engine::{OcrEngine, OcrError, OcrPage, OcrScanner};

#[derive(Debug, Clone)]
pub struct OcrClientConfig {
    pub service_url: String,
    /// Fixed upscale factor the service renders each page at before
    /// recognition; chosen for OCR legibility.
    pub render_scale: f32,
    pub timeout_secs: u64,
    pub max_concurrent: usize,
}

impl OcrClientConfig {
    pub fn new(service_url: String, render_scale: f32, max_concurrent: usize) -> Self {
        Self {
            service_url,
            render_scale,
            timeout_secs: 120,
            max_concurrent: max_concurrent.max(1),
        }
    }
}

#[derive(Debug, Serialize)]
struct OcrRequestBody {
    pdf_base64: String,
    render_scale: f32,
}

#[derive(Debug, Deserialize)]
struct OcrResponseBody {
    pages: Vec<OcrResponsePage>,
}

#[derive(Debug, Deserialize)]
struct OcrResponsePage {
    page: u32,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    image_png_base64: Option<String>,
}

/// HTTP OCR engine. Concurrent use is bounded by a semaphore; a leased
/// scanner owns its permit and returns it on drop, so the slot is freed
/// on every exit path of a document run.
pub struct HttpOcrEngine {
    client: Client,
    config: OcrClientConfig,
    permits: Arc<Semaphore>,
}

impl HttpOcrEngine {
    pub fn new(config: OcrClientConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        let permits = Arc::new(Semaphore::new(config.max_concurrent));

        Ok(Self {
            client,
            config,
            permits,
        })
    }
}

#[async_trait]
impl OcrEngine for HttpOcrEngine {
    async fn lease(&self) -> Result<Box<dyn OcrScanner>, OcrError> {
        let permit = self
            .permits
            .clone()
            .acquire_owned()
            .await
            .map_err(|e| OcrError::Service(e.to_string()))?;

        Ok(Box::new(HttpOcrScanner {
            client: self.client.clone(),
            config: self.config.clone(),
            _permit: permit,
        }))
    }
}

struct HttpOcrScanner {
    client: Client,
    config: OcrClientConfig,
    _permit: OwnedSemaphorePermit,
}

#[async_trait]
impl OcrScanner for HttpOcrScanner {
    async fn recognize(&self, pdf_bytes: &[u8]) -> Result<Vec<OcrPage>, OcrError> {
        let body = OcrRequestBody {
            pdf_base64: STANDARD.encode(pdf_bytes),
            render_scale: self.config.render_scale,
        };

        let response = self
            .client
            .post(&self.config.service_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| OcrError::Network(e.without_url().to_string()))?;

        if !response.status().is_success() {
            return Err(OcrError::Service(format!(
                "ocr service returned {}",
                response.status()
            )));
        }

        let parsed: OcrResponseBody = response
            .json()
            .await
            .map_err(|e| OcrError::Response(e.without_url().to_string()))?;

        pages_from_response(parsed)
    }
}

fn pages_from_response(response: OcrResponseBody) -> Result<Vec<OcrPage>, OcrError> {
    let mut pages = Vec::new();

    for page in response.pages {
        let text = page.text.map(|t| t.trim().to_string()).unwrap_or_default();
        let image_png = match page.image_png_base64 {
            Some(encoded) => Some(
                STANDARD
                    .decode(encoded.as_bytes())
                    .map_err(|e| OcrError::Response(format!("bad page image: {}", e)))?,
            ),
            None => None,
        };
        if text.is_empty() && image_png.is_none() {
            continue;
        }
        pages.push(OcrPage {
            number: page.page,
            text,
            image_png,
        });
    }

    Ok(pages)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_pages_keep_text_and_decode_images() {
        let response = OcrResponseBody {
            pages: vec![
                OcrResponsePage {
                    page: 1,
                    text: Some("  recognized text  ".to_string()),
                    image_png_base64: Some(STANDARD.encode([9u8, 8, 7])),
                },
                OcrResponsePage {
                    page: 2,
                    text: Some("   ".to_string()),
                    image_png_base64: None,
                },
            ],
        };

        let pages = pages_from_response(response).unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].number, 1);
        assert_eq!(pages[0].text, "recognized text");
        assert_eq!(pages[0].image_png.as_deref(), Some(&[9u8, 8, 7][..]));
    }

    #[test]
    fn corrupt_page_images_are_rejected() {
        let response = OcrResponseBody {
            pages: vec![OcrResponsePage {
                page: 1,
                text: Some("text".to_string()),
                image_png_base64: Some("not-base64!!!".to_string()),
            }],
        };

        assert!(matches!(
            pages_from_response(response),
            Err(OcrError::Response(_))
        ));
    }

    #[tokio::test]
    async fn leases_are_bounded_and_returned_on_drop() {
        let engine = HttpOcrEngine::new(OcrClientConfig::new(
            "http://localhost:9".to_string(),
            2.0,
            1,
        ))
        .unwrap();

        let first = engine.lease().await.unwrap();
        assert_eq!(engine.permits.available_permits(), 0);

        drop(first);
        assert_eq!(engine.permits.available_permits(), 1);

        let _second = engine.lease().await.unwrap();
        assert_eq!(engine.permits.available_permits(), 0);
    }
}
