//! Error types for the load producer.

use thiserror::Error;

/// Errors returned by a [`crate::RecordSink`].
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("Kafka error: {0}")]
    Kafka(#[from] rdkafka::error::KafkaError),

    #[error("Record rejected: {0}")]
    Rejected(String),
}

/// Errors that can occur while publishing events or telemetry.
#[derive(Error, Debug)]
pub enum ProducerError {
    #[error(transparent)]
    Sink(#[from] SinkError),

    #[error(transparent)]
    Types(#[from] loadgen_types::LoadgenTypesError),
}
