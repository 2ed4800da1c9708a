use async_trait::async_trait;
use tokio::sync::{mpsc, Mutex};

use crate::application::ports::ingest_queue::{IngestQueue, IngestQueueError, IngestRequest};

/// In-process ingestion queue. The sender half is the `IngestQueue`
/// port handed to the upload surface; the receiver half is drained by
/// the background worker pool.
pub struct MpscIngestQueue {
    sender: mpsc::UnboundedSender<IngestRequest>,
}

impl MpscIngestQueue {
    pub fn create_pair() -> (Self, IngestQueueReceiver) {
        let (sender, receiver) = mpsc::unbounded_channel();

        (
            Self { sender },
            IngestQueueReceiver {
                receiver: Mutex::new(receiver),
            },
        )
    }
}

#[async_trait]
impl IngestQueue for MpscIngestQueue {
    async fn enqueue(&self, request: IngestRequest) -> Result<(), IngestQueueError> {
        self.sender
            .send(request)
            .map_err(|_| IngestQueueError::Unavailable("queue closed".to_string()))
    }
}

pub struct IngestQueueReceiver {
    receiver: Mutex<mpsc::UnboundedReceiver<IngestRequest>>,
}

impl IngestQueueReceiver {
    /// Next request, or None once every sender is gone.
    pub async fn recv(&self) -> Option<IngestRequest> {
        let mut receiver = self.receiver.lock().await;
        receiver.recv().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[tokio::test]
    async fn requests_flow_sender_to_receiver_in_order() {
        let (queue, receiver) = MpscIngestQueue::create_pair();
        let first = IngestRequest {
            document_id: Uuid::new_v4(),
            force: false,
        };
        let second = IngestRequest {
            document_id: Uuid::new_v4(),
            force: true,
        };

        queue.enqueue(first).await.unwrap();
        queue.enqueue(second).await.unwrap();

        assert_eq!(receiver.recv().await, Some(first));
        assert_eq!(receiver.recv().await, Some(second));
    }

    #[tokio::test]
    async fn closed_queue_reports_unavailable() {
        let (queue, receiver) = MpscIngestQueue::create_pair();
        drop(receiver);

        let result = queue
            .enqueue(IngestRequest {
                document_id: Uuid::new_v4(),
                force: false,
            })
            .await;
        assert!(matches!(result, Err(IngestQueueError::Unavailable(_))));
    }
}
