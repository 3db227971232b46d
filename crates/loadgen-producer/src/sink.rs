//! Record sinks: the seam between the producer loop and the broker client.

use crate::error::SinkError;
use async_trait::async_trait;
use loadgen_types::RecordLocation;
use rdkafka::producer::{FutureProducer, FutureRecord};
use rdkafka::ClientConfig;
use std::time::Duration;

/// Publishes a single keyed record and waits for the broker's acknowledgment.
#[async_trait]
pub trait RecordSink: Send + Sync + 'static {
    async fn send(
        &self,
        topic: &str,
        key: &str,
        payload: &[u8],
    ) -> Result<RecordLocation, SinkError>;
}

/// [`RecordSink`] backed by an rdkafka [`FutureProducer`].
pub struct KafkaRecordSink {
    producer: FutureProducer,
    queue_timeout: Duration,
}

impl KafkaRecordSink {
    /// Create a producer from a prepared client configuration.
    ///
    /// `queue_timeout` bounds how long a send waits for room in the local
    /// producer queue; delivery itself is bounded by `message.timeout.ms`.
    pub fn new(config: &ClientConfig, queue_timeout: Duration) -> Result<Self, SinkError> {
        let producer: FutureProducer = config.create()?;
        Ok(Self {
            producer,
            queue_timeout,
        })
    }
}

#[async_trait]
impl RecordSink for KafkaRecordSink {
    async fn send(
        &self,
        topic: &str,
        key: &str,
        payload: &[u8],
    ) -> Result<RecordLocation, SinkError> {
        let record = FutureRecord::to(topic).key(key).payload(payload);

        let (partition, offset) = self
            .producer
            .send(record, self.queue_timeout)
            .await
            .map_err(|(err, _)| err)?;

        Ok(RecordLocation::new(partition, offset))
    }
}
