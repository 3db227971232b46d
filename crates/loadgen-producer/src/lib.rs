//! Self-reporting load producer.
//!
//! Publishes synthetic events to a data stream while batching the outcome of
//! every send and shipping those batches to a telemetry stream.
//!
//! # Architecture
//!
//! ```text
//!  DriverLoop ──► EventPublisher ──► data stream
//!      │               │
//!      │          EventOutcome
//!      ▼               │
//!  ResultAccumulator ◄─┘
//!      │  summed latency >= threshold
//!      ▼
//!  TelemetryReporter ──(spawned task)──► telemetry stream
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use loadgen_producer::{DriverLoop, KafkaRecordSink, ProducerSettings, StreamTarget};
//! use std::sync::Arc;
//!
//! let data = Arc::new(KafkaRecordSink::new(&data_config, timeout)?);
//! let telemetry = Arc::new(KafkaRecordSink::new(&telemetry_config, timeout)?);
//! let driver = DriverLoop::new(
//!     StreamTarget::new(data, "vehicles"),
//!     StreamTarget::new(telemetry, "telemetry"),
//!     &ProducerSettings::new(client_id),
//! );
//! driver.run().await;
//! ```

pub mod accumulator;
pub mod driver;
pub mod error;
pub mod payload;
pub mod publisher;
pub mod reporter;
pub mod settings;
pub mod sink;
pub mod testing;

pub use accumulator::{ResultAccumulator, DEFAULT_BATCH_THRESHOLD};
pub use driver::{DriverLoop, StreamTarget};
pub use error::{ProducerError, SinkError};
pub use payload::{PayloadGenerator, DEFAULT_PAYLOAD_SIZE};
pub use publisher::{EventPublisher, DEFAULT_FAILURE_BACKOFF};
pub use reporter::{send_batch, TelemetryReporter};
pub use settings::ProducerSettings;
pub use sink::{KafkaRecordSink, RecordSink};
