use std::sync::Arc;

use crate::application::services::IngestionService;
use crate::infrastructure::messaging::IngestQueueReceiver;

/// Bounded worker pool draining the ingestion queue. Each worker
/// processes one document at a time, so per-document chunk ordering
/// stays sequential while distinct documents proceed in parallel.
pub struct BackgroundProcessor {
    receiver: Arc<IngestQueueReceiver>,
    ingestion: Arc<IngestionService>,
    worker_count: usize,
}

impl BackgroundProcessor {
    pub fn new(receiver: Arc<IngestQueueReceiver>, ingestion: Arc<IngestionService>) -> Self {
        Self {
            receiver,
            ingestion,
            worker_count: 3,
        }
    }

    pub fn with_worker_count(mut self, count: usize) -> Self {
        self.worker_count = count.max(1);
        self
    }

    pub async fn start(&self) {
        tracing::info!(workers = self.worker_count, "starting ingestion workers");

        let mut handles = Vec::new();
        for worker_id in 0..self.worker_count {
            let receiver = self.receiver.clone();
            let ingestion = self.ingestion.clone();
            handles.push(tokio::spawn(async move {
                worker_loop(worker_id, receiver, ingestion).await;
            }));
        }

        for (worker_id, handle) in handles.into_iter().enumerate() {
            if let Err(error) = handle.await {
                tracing::error!(worker = worker_id, error = %error, "ingestion worker panicked");
            }
        }

        tracing::info!("ingestion workers stopped");
    }
}

async fn worker_loop(
    worker_id: usize,
    receiver: Arc<IngestQueueReceiver>,
    ingestion: Arc<IngestionService>,
) {
    tracing::debug!(worker = worker_id, "worker started");

    while let Some(request) = receiver.recv().await {
        tracing::info!(
            worker = worker_id,
            document = %request.document_id,
            force = request.force,
            "picked up ingestion request"
        );

        match ingestion.ingest(request).await {
            Ok(report) => {
                tracing::info!(
                    worker = worker_id,
                    document = %request.document_id,
                    report = ?report,
                    "ingestion finished"
                );
            }
            Err(error) => {
                tracing::error!(
                    worker = worker_id,
                    document = %request.document_id,
                    error = %error,
                    "ingestion errored"
                );
            }
        }
    }

    tracing::debug!(worker = worker_id, "worker stopped, queue closed");
}
