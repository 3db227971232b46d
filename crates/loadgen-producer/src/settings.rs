//! Producer loop tunables.

use crate::accumulator::DEFAULT_BATCH_THRESHOLD;
use crate::payload::DEFAULT_PAYLOAD_SIZE;
use crate::publisher::DEFAULT_FAILURE_BACKOFF;
use std::time::Duration;

/// Settings shared by the publisher, accumulator and reporter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProducerSettings {
    /// Identifier stamped on every outcome, fixed for the process lifetime.
    pub client_id: String,
    /// Summed latency that triggers a telemetry flush.
    pub batch_threshold: Duration,
    /// Pause after a failed data-plane send.
    pub failure_backoff: Duration,
    /// Size of the filler payload in bytes.
    pub payload_size: usize,
}

impl ProducerSettings {
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            batch_threshold: DEFAULT_BATCH_THRESHOLD,
            failure_backoff: DEFAULT_FAILURE_BACKOFF,
            payload_size: DEFAULT_PAYLOAD_SIZE,
        }
    }
}
