pub mod answering;
pub mod ask;
pub mod chunker;
pub mod ingestion;
pub mod rate_limit;
pub mod retrieval;

pub use answering::AnswerService;
pub use ask::{AskRequest, AskService};
pub use chunker::{ChunkerConfig, ChunkingError, TextChunker};
pub use ingestion::{IngestionReport, IngestionService, ThrottleConfig};
pub use rate_limit::RateLimiter;
pub use retrieval::{RetrievalService, RetrievedContext};
