//! The send / record / flush loop.

use crate::accumulator::ResultAccumulator;
use crate::payload::PayloadGenerator;
use crate::publisher::EventPublisher;
use crate::reporter::TelemetryReporter;
use crate::settings::ProducerSettings;
use crate::sink::RecordSink;
use std::convert::Infallible;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Where a stream's records go.
pub struct StreamTarget<S: RecordSink> {
    pub sink: Arc<S>,
    pub topic: String,
}

impl<S: RecordSink> StreamTarget<S> {
    pub fn new(sink: Arc<S>, topic: impl Into<String>) -> Self {
        Self {
            sink,
            topic: topic.into(),
        }
    }
}

/// Owns the accumulator and drives publishing forever.
///
/// The loop is strictly sequential; the only concurrency is the telemetry
/// reports it spawns, each of which owns its batch.
pub struct DriverLoop<D: RecordSink, T: RecordSink> {
    publisher: EventPublisher<D>,
    accumulator: ResultAccumulator,
    reporter: TelemetryReporter<T>,
}

impl<D: RecordSink, T: RecordSink> DriverLoop<D, T> {
    pub fn new(
        data: StreamTarget<D>,
        telemetry: StreamTarget<T>,
        settings: &ProducerSettings,
    ) -> Self {
        let publisher = EventPublisher::new(data.sink, data.topic, settings.client_id.as_str())
            .with_payload(PayloadGenerator::new(settings.payload_size))
            .with_failure_backoff(settings.failure_backoff);

        Self {
            publisher,
            accumulator: ResultAccumulator::new(settings.batch_threshold),
            reporter: TelemetryReporter::new(telemetry.sink, telemetry.topic),
        }
    }

    pub fn accumulator(&self) -> &ResultAccumulator {
        &self.accumulator
    }

    pub fn publisher(&self) -> &EventPublisher<D> {
        &self.publisher
    }

    /// Run one iteration: send, record, and dispatch a report if due.
    ///
    /// Returns the handle of the spawned report, if one was dispatched.
    pub async fn step(&mut self) -> Option<JoinHandle<()>> {
        let outcome = self.publisher.send_event().await;
        info!("{outcome}");

        if !self.accumulator.record(outcome) {
            return None;
        }

        let batch = self.accumulator.take_batch();
        debug!(events = batch.len(), "Flushing telemetry batch");
        Some(self.reporter.report(batch))
    }

    /// Loop until the process is stopped. Report handles are dropped.
    pub async fn run(mut self) -> Infallible {
        info!(
            client_id = self.publisher.client_id(),
            data_topic = self.publisher.topic(),
            telemetry_topic = self.reporter.topic(),
            threshold_ms = self.accumulator.threshold_ms(),
            "Starting load generation"
        );

        loop {
            drop(self.step().await);
        }
    }
}
