use std::env;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable: {0}")]
    MissingVariable(String),
    #[error("invalid value for environment variable: {0}")]
    InvalidValue(String),
}

/// Runtime configuration, loaded once at startup and handed to the
/// container. Nothing reads the environment after this point.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub server_port: u16,
    pub storage_root: String,

    pub embeddings_service_url: String,
    pub embedding_dimension: usize,

    pub generation_service_url: String,
    pub generation_model: String,
    pub answer_max_tokens: u32,

    pub ocr_service_url: String,
    pub ocr_render_scale: f32,
    pub ocr_max_concurrent: usize,

    pub chunk_max_size: usize,
    pub chunk_overlap: usize,
    pub chunk_min_size: usize,

    pub ingest_workers: usize,
    pub throttle_every_chunks: usize,
    pub throttle_pause: Duration,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            database_url: require("DATABASE_URL")?,
            server_port: parse_or("SERVER_PORT", 3000)?,
            storage_root: env_or("STORAGE_ROOT", "./storage"),

            embeddings_service_url: env_or(
                "EMBEDDINGS_SERVICE_URL",
                "http://localhost:8081/embeddings",
            ),
            embedding_dimension: parse_or("EMBEDDING_DIMENSION", 768)?,

            generation_service_url: env_or(
                "GENERATION_SERVICE_URL",
                "http://localhost:8082/v1/chat/completions",
            ),
            generation_model: env_or("GENERATION_MODEL", "default"),
            answer_max_tokens: parse_or("ANSWER_MAX_TOKENS", 1024)?,

            ocr_service_url: env_or("OCR_SERVICE_URL", "http://localhost:8083/ocr"),
            ocr_render_scale: parse_or("OCR_RENDER_SCALE", 2.0)?,
            ocr_max_concurrent: parse_or("OCR_MAX_CONCURRENT", 2)?,

            chunk_max_size: parse_or("CHUNK_MAX_SIZE", 1000)?,
            chunk_overlap: parse_or("CHUNK_OVERLAP", 200)?,
            chunk_min_size: parse_or("CHUNK_MIN_SIZE", 100)?,

            ingest_workers: parse_or("INGEST_WORKERS", 3)?,
            throttle_every_chunks: parse_or("THROTTLE_EVERY_CHUNKS", 4)?,
            throttle_pause: Duration::from_millis(parse_or("THROTTLE_PAUSE_MS", 200)?),
        })
    }
}

fn require(key: &str) -> Result<String, ConfigError> {
    env::var(key).map_err(|_| ConfigError::MissingVariable(key.to_string()))
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key.to_string())),
        _ => Ok(default),
    }
}
