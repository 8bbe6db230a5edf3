//! Buffered event ingestion
//!
//! Accepted events are queued on a bounded channel and flushed to the store
//! by a background worker, either when a full batch accumulates or on a
//! timer. A full buffer rejects the caller (503 at the HTTP boundary) rather
//! than blocking; a failed batch insert is logged and dropped, retries are
//! not this layer's job.

use std::sync::Arc;
use std::time::Duration;

use event_store::{EventSink, NewEvent};
use serde::Serialize;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{error, info};
use utoipa::ToSchema;

/// Ingestion buffer tuning
#[derive(Debug, Clone)]
pub struct IngestConfig {
    /// Bounded queue capacity between the HTTP handler and the worker
    pub buffer_size: usize,
    /// Flush as soon as this many events accumulate
    pub batch_size: usize,
    /// Flush whatever is pending at least this often
    pub flush_interval: Duration,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            buffer_size: 1000,
            batch_size: 100,
            flush_interval: Duration::from_secs(5),
        }
    }
}

/// Queue occupancy snapshot, reported by the health endpoint.
#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
pub struct BufferUsage {
    pub queued: usize,
    pub capacity: usize,
}

/// Raised when an event cannot be queued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnqueueError {
    /// Queue is at capacity; caller should retry later.
    Full,
    /// Worker has shut down.
    Closed,
}

/// Handle to the ingestion queue. Cheap to clone; all clones feed the same
/// worker.
#[derive(Clone)]
pub struct IngestBuffer {
    tx: mpsc::Sender<NewEvent>,
}

impl IngestBuffer {
    /// Spawn the flush worker and return a queue handle plus the worker's
    /// join handle. The worker drains and flushes remaining events when the
    /// last queue handle is dropped.
    pub fn spawn(sink: Arc<dyn EventSink>, config: IngestConfig) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(config.buffer_size);
        let worker = tokio::spawn(run_worker(rx, sink, config));
        (Self { tx }, worker)
    }

    /// Queue one event without blocking.
    pub fn enqueue(&self, event: NewEvent) -> Result<(), EnqueueError> {
        self.tx.try_send(event).map_err(|e| match e {
            TrySendError::Full(_) => EnqueueError::Full,
            TrySendError::Closed(_) => EnqueueError::Closed,
        })
    }

    /// Current queue occupancy.
    pub fn usage(&self) -> BufferUsage {
        let capacity = self.tx.max_capacity();
        BufferUsage {
            queued: capacity.saturating_sub(self.tx.capacity()),
            capacity,
        }
    }

    #[cfg(test)]
    fn from_sender(tx: mpsc::Sender<NewEvent>) -> Self {
        Self { tx }
    }
}

async fn run_worker(
    mut rx: mpsc::Receiver<NewEvent>,
    sink: Arc<dyn EventSink>,
    config: IngestConfig,
) {
    let mut interval = tokio::time::interval(config.flush_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut batch: Vec<NewEvent> = Vec::with_capacity(config.batch_size);

    loop {
        tokio::select! {
            received = rx.recv() => match received {
                Some(event) => {
                    batch.push(event);
                    if batch.len() >= config.batch_size {
                        flush(&sink, &mut batch).await;
                    }
                }
                None => {
                    // Final flush before shutdown
                    flush(&sink, &mut batch).await;
                    break;
                }
            },
            _ = interval.tick() => {
                flush(&sink, &mut batch).await;
            }
        }
    }

    info!("Ingest worker stopped");
}

async fn flush(sink: &Arc<dyn EventSink>, batch: &mut Vec<NewEvent>) {
    if batch.is_empty() {
        return;
    }

    let events = std::mem::take(batch);
    let pending = events.len();

    match sink.insert_batch(events).await {
        Ok(inserted) => info!(inserted, "Flushed ingest batch"),
        Err(e) => error!(error = %e, dropped = pending, "Failed to insert ingest batch"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use event_store::StoreResult;
    use mockall::mock;

    mock! {
        Sink {}

        #[async_trait]
        impl EventSink for Sink {
            async fn insert_batch(&self, events: Vec<NewEvent>) -> StoreResult<u64>;
        }
    }

    fn sample_event() -> NewEvent {
        NewEvent {
            event_type: event_store::EventType::ApiCall,
            severity: event_store::Severity::Low,
            user_id: Some("user-1".to_string()),
            ip_address: "198.51.100.4".parse().unwrap(),
            user_agent: None,
            endpoint: Some("/api/reports".to_string()),
            http_method: Some("GET".to_string()),
            status_code: Some(200),
            metadata: None,
            occurred_at: None,
            ingested_at: None,
        }
    }

    #[tokio::test]
    async fn flushes_when_batch_size_is_reached() {
        let (flushed_tx, mut flushed_rx) = mpsc::unbounded_channel();

        let mut sink = MockSink::new();
        sink.expect_insert_batch().returning(move |events| {
            let count = events.len() as u64;
            let _ = flushed_tx.send(count);
            Ok(count)
        });

        let config = IngestConfig {
            buffer_size: 16,
            batch_size: 3,
            // Long enough that only the batch-size path can trigger
            flush_interval: Duration::from_secs(3600),
        };
        let (buffer, _worker) = IngestBuffer::spawn(Arc::new(sink), config);

        for _ in 0..3 {
            buffer.enqueue(sample_event()).unwrap();
        }

        assert_eq!(flushed_rx.recv().await, Some(3));
    }

    #[tokio::test(start_paused = true)]
    async fn flushes_partial_batch_on_interval() {
        let (flushed_tx, mut flushed_rx) = mpsc::unbounded_channel();

        let mut sink = MockSink::new();
        sink.expect_insert_batch().returning(move |events| {
            let count = events.len() as u64;
            let _ = flushed_tx.send(count);
            Ok(count)
        });

        let config = IngestConfig {
            buffer_size: 16,
            batch_size: 100,
            flush_interval: Duration::from_secs(5),
        };
        let (buffer, _worker) = IngestBuffer::spawn(Arc::new(sink), config);

        buffer.enqueue(sample_event()).unwrap();

        // The paused clock auto-advances to the next interval tick.
        assert_eq!(flushed_rx.recv().await, Some(1));
    }

    #[tokio::test]
    async fn drains_remaining_events_on_shutdown() {
        let (flushed_tx, mut flushed_rx) = mpsc::unbounded_channel();

        let mut sink = MockSink::new();
        sink.expect_insert_batch().returning(move |events| {
            let count = events.len() as u64;
            let _ = flushed_tx.send(count);
            Ok(count)
        });

        let config = IngestConfig {
            buffer_size: 16,
            batch_size: 100,
            flush_interval: Duration::from_secs(3600),
        };
        let (buffer, worker) = IngestBuffer::spawn(Arc::new(sink), config);

        buffer.enqueue(sample_event()).unwrap();
        buffer.enqueue(sample_event()).unwrap();
        drop(buffer);

        worker.await.unwrap();
        assert_eq!(flushed_rx.recv().await, Some(2));
    }

    #[tokio::test]
    async fn full_buffer_rejects_without_blocking() {
        // No worker draining this channel, so the second enqueue must fail.
        let (tx, _rx) = mpsc::channel(1);
        let buffer = IngestBuffer::from_sender(tx);

        assert!(buffer.enqueue(sample_event()).is_ok());
        assert_eq!(buffer.enqueue(sample_event()), Err(EnqueueError::Full));

        let usage = buffer.usage();
        assert_eq!(usage.queued, 1);
        assert_eq!(usage.capacity, 1);
    }
}
