pub mod background_processor;
pub mod ingest_queue;

pub use background_processor::BackgroundProcessor;
pub use ingest_queue::{IngestQueueReceiver, MpscIngestQueue};
