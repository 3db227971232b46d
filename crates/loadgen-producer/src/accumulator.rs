//! Accumulation of per-event outcomes and the telemetry flush policy.
//!
//! The flush trigger is the sum of per-event latencies since the last flush,
//! not wall-clock time or event count. A slow broker therefore produces more
//! frequent telemetry batches than a fast one.

use loadgen_types::EventOutcome;
use std::time::Duration;

/// Default latency budget that triggers a flush.
pub const DEFAULT_BATCH_THRESHOLD: Duration = Duration::from_millis(1000);

/// Ordered outcomes recorded since the last flush.
#[derive(Debug)]
pub struct ResultAccumulator {
    pending: Vec<EventOutcome>,
    accumulated_elapsed_ms: u64,
    threshold_ms: u64,
}

impl ResultAccumulator {
    pub fn new(threshold: Duration) -> Self {
        Self {
            pending: Vec::new(),
            accumulated_elapsed_ms: 0,
            threshold_ms: threshold.as_millis().try_into().unwrap_or(u64::MAX),
        }
    }

    /// Append an outcome and report whether the batch is due for a flush.
    ///
    /// Returns true as soon as the outcome that crosses the threshold is
    /// recorded. The caller is expected to [`take_batch`](Self::take_batch)
    /// before recording anything else.
    pub fn record(&mut self, outcome: EventOutcome) -> bool {
        self.accumulated_elapsed_ms = self
            .accumulated_elapsed_ms
            .saturating_add(outcome.elapsed_ms());
        self.pending.push(outcome);
        self.should_flush()
    }

    pub fn should_flush(&self) -> bool {
        self.accumulated_elapsed_ms >= self.threshold_ms
    }

    /// Detach every pending outcome and reset the latency sum.
    pub fn take_batch(&mut self) -> Vec<EventOutcome> {
        self.accumulated_elapsed_ms = 0;
        std::mem::take(&mut self.pending)
    }

    pub fn pending(&self) -> &[EventOutcome] {
        &self.pending
    }

    pub fn accumulated_elapsed_ms(&self) -> u64 {
        self.accumulated_elapsed_ms
    }

    pub fn threshold_ms(&self) -> u64 {
        self.threshold_ms
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl Default for ResultAccumulator {
    fn default() -> Self {
        Self::new(DEFAULT_BATCH_THRESHOLD)
    }
}
