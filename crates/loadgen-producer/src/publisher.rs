//! Data-plane publishing: one synthetic event per call.

use crate::error::ProducerError;
use crate::payload::PayloadGenerator;
use crate::sink::RecordSink;
use chrono::Utc;
use loadgen_types::EventOutcome;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::warn;

/// Default pause after a failed send.
pub const DEFAULT_FAILURE_BACKOFF: Duration = Duration::from_secs(1);

/// Sends synthetic events to the data stream and turns every attempt into an
/// [`EventOutcome`]. Failures never propagate to the caller.
pub struct EventPublisher<S: RecordSink> {
    sink: Arc<S>,
    topic: String,
    client_id: String,
    payload: PayloadGenerator,
    failure_backoff: Duration,
}

impl<S: RecordSink> EventPublisher<S> {
    pub fn new(sink: Arc<S>, topic: impl Into<String>, client_id: impl Into<String>) -> Self {
        Self {
            sink,
            topic: topic.into(),
            client_id: client_id.into(),
            payload: PayloadGenerator::default(),
            failure_backoff: DEFAULT_FAILURE_BACKOFF,
        }
    }

    pub fn with_payload(mut self, payload: PayloadGenerator) -> Self {
        self.payload = payload;
        self
    }

    pub fn with_failure_backoff(mut self, backoff: Duration) -> Self {
        self.failure_backoff = backoff;
        self
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Publish one event and wait for its acknowledgment.
    ///
    /// Elapsed time covers the attempt, not key/payload construction. On
    /// failure the error is logged and the call sleeps for the failure backoff
    /// before returning a sentinel outcome; the backoff counts towards the
    /// outcome's elapsed time.
    pub async fn send_event(&self) -> EventOutcome {
        let key = self.payload.next_key();

        let start = Instant::now();
        let sent = self.sink.send(&self.topic, &key, self.payload.payload()).await;

        let outcome = sent.map_err(ProducerError::from).and_then(|location| {
            EventOutcome::success(
                self.client_id.as_str(),
                location,
                elapsed_ms_since(start),
                Utc::now(),
            )
            .map_err(ProducerError::from)
        });

        match outcome {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!("Error sending event {key} to '{}': {err}", self.topic);
                tokio::time::sleep(self.failure_backoff).await;
                EventOutcome::failure(
                    self.client_id.as_str(),
                    err.to_string(),
                    elapsed_ms_since(start),
                    Utc::now(),
                )
            }
        }
    }
}

fn elapsed_ms_since(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}
