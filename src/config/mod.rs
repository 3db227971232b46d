//! Command-line configuration.

pub mod duration;

use crate::connect::EventHubConnection;
use anyhow::Context;
use clap::Parser;
use loadgen_producer::{
    ProducerSettings, DEFAULT_BATCH_THRESHOLD, DEFAULT_FAILURE_BACKOFF, DEFAULT_PAYLOAD_SIZE,
};
use std::time::Duration;
use uuid::Uuid;

pub use duration::parse_duration;

/// Default delivery timeout for a single record.
pub const DEFAULT_MESSAGE_TIMEOUT: &str = "30s";

/// Largest `message.timeout.ms` librdkafka accepts.
pub const MAX_MESSAGE_TIMEOUT: Duration = Duration::from_millis(i32::MAX as u64);

#[derive(Parser, Clone)]
#[command(name = "eventhub-loadgen")]
#[command(
    about = "Publish synthetic events to an Event Hub and report producer latency to a second hub"
)]
#[command(version)]
pub struct LoadgenArgs {
    /// Connection string of the event hub receiving the synthetic events
    #[arg(value_name = "DATA_CONNECTION_STRING", env = "LOADGEN_DATA_CONNECTION_STRING")]
    pub data_connection_string: String,

    /// Connection string of the event hub receiving telemetry batches
    #[arg(
        value_name = "TELEMETRY_CONNECTION_STRING",
        env = "LOADGEN_TELEMETRY_CONNECTION_STRING"
    )]
    pub telemetry_connection_string: String,

    /// Summed send latency that triggers a telemetry batch (e.g. "1000ms", "2s")
    #[arg(long, default_value = "1000ms", value_parser = parse_duration, env = "LOADGEN_BATCH_THRESHOLD")]
    pub batch_threshold: Duration,

    /// Pause after a failed send
    #[arg(long, default_value = "1s", value_parser = parse_duration, env = "LOADGEN_FAILURE_BACKOFF")]
    pub failure_backoff: Duration,

    /// Size of each synthetic event payload in bytes
    #[arg(long, default_value_t = DEFAULT_PAYLOAD_SIZE, env = "LOADGEN_PAYLOAD_SIZE")]
    pub payload_size: usize,

    /// Delivery timeout for a single record
    #[arg(long, default_value = DEFAULT_MESSAGE_TIMEOUT, value_parser = parse_duration, env = "LOADGEN_MESSAGE_TIMEOUT")]
    pub message_timeout: Duration,

    /// Client identifier stamped on every outcome (default: random UUID)
    #[arg(long, env = "LOADGEN_CLIENT_ID")]
    pub client_id: Option<String>,
}

impl std::fmt::Debug for LoadgenArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadgenArgs")
            .field("batch_threshold", &self.batch_threshold)
            .field("failure_backoff", &self.failure_backoff)
            .field("payload_size", &self.payload_size)
            .field("message_timeout", &self.message_timeout)
            .field("client_id", &self.client_id)
            .finish_non_exhaustive()
    }
}

/// Validated configuration for one load generator process.
#[derive(Debug, Clone)]
pub struct LoadgenConfig {
    pub data: EventHubConnection,
    pub telemetry: EventHubConnection,
    pub producer: ProducerSettings,
    pub message_timeout: Duration,
}

impl LoadgenConfig {
    pub fn from_args(args: LoadgenArgs) -> anyhow::Result<Self> {
        let data = EventHubConnection::parse(&args.data_connection_string)
            .context("Invalid data connection string")?;
        let telemetry = EventHubConnection::parse(&args.telemetry_connection_string)
            .context("Invalid telemetry connection string")?;

        if args.message_timeout < Duration::from_millis(1)
            || args.message_timeout > MAX_MESSAGE_TIMEOUT
        {
            anyhow::bail!(
                "Message timeout must be between 1ms and {}ms, got {}ms",
                MAX_MESSAGE_TIMEOUT.as_millis(),
                args.message_timeout.as_millis()
            );
        }

        let client_id = args
            .client_id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        Ok(Self {
            data,
            telemetry,
            producer: ProducerSettings {
                client_id,
                batch_threshold: args.batch_threshold,
                failure_backoff: args.failure_backoff,
                payload_size: args.payload_size,
            },
            message_timeout: args.message_timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATA: &str =
        "Endpoint=sb://data-ns.servicebus.windows.net/;SharedAccessKeyName=s;SharedAccessKey=k;EntityPath=vehicles";
    const TELEMETRY: &str =
        "Endpoint=sb://tel-ns.servicebus.windows.net/;SharedAccessKeyName=s;SharedAccessKey=k;EntityPath=loadgen-telemetry";

    #[test]
    fn test_defaults_match_original_behaviour() {
        let args = LoadgenArgs::try_parse_from(["eventhub-loadgen", DATA, TELEMETRY]).unwrap();
        let config = LoadgenConfig::from_args(args).unwrap();

        assert_eq!(config.data.event_hub_name(), "vehicles");
        assert_eq!(config.telemetry.event_hub_name(), "loadgen-telemetry");
        assert_eq!(config.producer.batch_threshold, DEFAULT_BATCH_THRESHOLD);
        assert_eq!(config.producer.failure_backoff, DEFAULT_FAILURE_BACKOFF);
        assert_eq!(config.producer.payload_size, 1024);
        assert_eq!(config.message_timeout, Duration::from_secs(30));
        assert!(Uuid::parse_str(&config.producer.client_id).is_ok());
    }

    #[test]
    fn test_tunables_override_defaults() {
        let args = LoadgenArgs::try_parse_from([
            "eventhub-loadgen",
            DATA,
            TELEMETRY,
            "--batch-threshold",
            "5s",
            "--failure-backoff",
            "250ms",
            "--payload-size",
            "64",
            "--client-id",
            "rig-7",
        ])
        .unwrap();
        let config = LoadgenConfig::from_args(args).unwrap();

        assert_eq!(config.producer.batch_threshold, Duration::from_secs(5));
        assert_eq!(config.producer.failure_backoff, Duration::from_millis(250));
        assert_eq!(config.producer.payload_size, 64);
        assert_eq!(config.producer.client_id, "rig-7");
    }

    #[test]
    fn test_missing_argument_is_a_parse_error() {
        assert!(LoadgenArgs::try_parse_from(["eventhub-loadgen", DATA]).is_err());
    }

    #[test]
    fn test_malformed_connection_string_is_rejected() {
        let args =
            LoadgenArgs::try_parse_from(["eventhub-loadgen", "garbage", TELEMETRY]).unwrap();
        let err = LoadgenConfig::from_args(args).unwrap_err();
        assert!(format!("{err:#}").contains("Invalid data connection string"));
    }

    #[test]
    fn test_message_timeout_outside_librdkafka_range_is_rejected() {
        for timeout in ["0s", "30000h"] {
            let args = LoadgenArgs::try_parse_from([
                "eventhub-loadgen",
                DATA,
                TELEMETRY,
                "--message-timeout",
                timeout,
            ])
            .unwrap();
            let err = LoadgenConfig::from_args(args).unwrap_err();
            assert!(err.to_string().contains("Message timeout must be between"));
        }
    }

    #[test]
    fn test_debug_does_not_leak_connection_strings() {
        let args = LoadgenArgs::try_parse_from(["eventhub-loadgen", DATA, TELEMETRY]).unwrap();
        assert!(!format!("{args:?}").contains("SharedAccessKey"));
    }
}
