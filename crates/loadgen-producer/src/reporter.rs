//! Telemetry reporting: ships a flushed batch as one JSON record.

use crate::error::ProducerError;
use crate::sink::RecordSink;
use loadgen_types::{encode_batch, EventOutcome, RecordLocation};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use uuid::Uuid;

/// Publishes telemetry batches to the secondary stream.
pub struct TelemetryReporter<S: RecordSink> {
    sink: Arc<S>,
    topic: Arc<str>,
}

impl<S: RecordSink> TelemetryReporter<S> {
    pub fn new(sink: Arc<S>, topic: impl Into<Arc<str>>) -> Self {
        Self {
            sink,
            topic: topic.into(),
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Dispatch `batch` on its own task and return immediately.
    ///
    /// The task owns the batch. Errors are logged and the batch is dropped;
    /// nothing is retried. Callers may drop the handle.
    pub fn report(&self, batch: Vec<EventOutcome>) -> JoinHandle<()> {
        let sink = Arc::clone(&self.sink);
        let topic = Arc::clone(&self.topic);

        tokio::spawn(async move {
            let events = batch.len();
            match send_batch(sink.as_ref(), &topic, &batch).await {
                Ok(location) => info!(
                    partition = location.partition,
                    offset = location.offset,
                    events,
                    "Telemetry batch sent - Partition: {}, Offset: {}, Events: {events}",
                    location.partition,
                    location.offset
                ),
                Err(err) => warn!(events, "Error sending telemetry batch: {err}"),
            }
        })
    }
}

/// Encode `batch` and publish it under a random key.
pub async fn send_batch<S: RecordSink + ?Sized>(
    sink: &S,
    topic: &str,
    batch: &[EventOutcome],
) -> Result<RecordLocation, ProducerError> {
    let json = encode_batch(batch)?;
    let key = Uuid::new_v4().to_string();
    Ok(sink.send(topic, &key, json.as_bytes()).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MemorySink, SinkResponse};
    use chrono::Utc;
    use std::time::Duration;

    fn batch(n: usize) -> Vec<EventOutcome> {
        (0..n)
            .map(|i| {
                EventOutcome::success(
                    "client-1",
                    RecordLocation::new(1, i as i64),
                    300,
                    Utc::now(),
                )
                .unwrap()
            })
            .collect()
    }

    #[tokio::test]
    async fn test_send_batch_publishes_json_array_under_uuid_key() {
        let sink = MemorySink::new();

        let location = send_batch(&sink, "telemetry", &batch(3)).await.unwrap();
        assert_eq!(location, RecordLocation::new(0, 0));

        let records = sink.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].topic, "telemetry");
        assert!(Uuid::parse_str(&records[0].key).is_ok());

        let value: serde_json::Value = serde_json::from_slice(&records[0].payload).unwrap();
        let entries = value.as_array().unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[2]["Offset"], 2);
        assert_eq!(entries[0]["ExceptionMessage"], serde_json::Value::Null);
    }

    #[tokio::test]
    async fn test_keys_differ_between_batches() {
        let sink = MemorySink::new();
        send_batch(&sink, "telemetry", &batch(1)).await.unwrap();
        send_batch(&sink, "telemetry", &batch(1)).await.unwrap();

        let records = sink.records();
        assert_ne!(records[0].key, records[1].key);
    }

    #[tokio::test]
    async fn test_report_failure_is_swallowed() {
        let sink = Arc::new(MemorySink::with_script([SinkResponse::fail_after(
            0,
            "telemetry hub unavailable",
        )]));
        let reporter = TelemetryReporter::new(Arc::clone(&sink), "telemetry");

        reporter.report(batch(2)).await.unwrap();

        assert!(sink.records().is_empty());
        assert_eq!(sink.attempts(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_report_returns_before_delivery() {
        let sink = Arc::new(MemorySink::with_script([SinkResponse::ack_after(500)]));
        let reporter = TelemetryReporter::new(Arc::clone(&sink), "telemetry");

        let handle = reporter.report(batch(1));
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(sink.records().is_empty());

        handle.await.unwrap();
        assert_eq!(sink.records().len(), 1);
    }
}
