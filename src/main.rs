//! Command-line interface for eventhub-loadgen
//!
//! # Usage
//! ```bash
//! eventhub-loadgen <DATA_CONNECTION_STRING> <TELEMETRY_CONNECTION_STRING>
//!
//! # Flush telemetry every 5s of summed latency, back off 500ms after failures
//! eventhub-loadgen "$DATA_CONN" "$TELEMETRY_CONN" \
//!   --batch-threshold 5s --failure-backoff 500ms
//! ```
//!
//! Log verbosity follows `RUST_LOG` (default `info`).

use anyhow::Context;
use clap::{error::ErrorKind, CommandFactory, Parser};
use eventhub_loadgen::{LoadgenArgs, LoadgenConfig};
use loadgen_producer::{DriverLoop, KafkaRecordSink, StreamTarget};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// How long a send may wait for room in the local producer queue.
const QUEUE_TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = match LoadgenArgs::try_parse() {
        Ok(args) => args,
        Err(err) => {
            match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => err.print()?,
                // clap's message already carries the usage line
                _ => println!("{err}"),
            }
            return Ok(());
        }
    };

    let config = match LoadgenConfig::from_args(args) {
        Ok(config) => config,
        Err(err) => {
            print_usage(&format!("{err:#}"));
            return Ok(());
        }
    };

    info!(
        data = %config.data,
        telemetry = %config.telemetry,
        client_id = %config.producer.client_id,
        "Connecting to event hubs"
    );

    let data_sink = KafkaRecordSink::new(
        &config.data.client_config(config.message_timeout),
        QUEUE_TIMEOUT,
    )
    .context("Failed to create data producer")?;
    let telemetry_sink = KafkaRecordSink::new(
        &config.telemetry.client_config(config.message_timeout),
        QUEUE_TIMEOUT,
    )
    .context("Failed to create telemetry producer")?;

    let driver = DriverLoop::new(
        StreamTarget::new(Arc::new(data_sink), config.data.event_hub_name()),
        StreamTarget::new(Arc::new(telemetry_sink), config.telemetry.event_hub_name()),
        &config.producer,
    );

    tokio::select! {
        _ = driver.run() => {}
        signal = tokio::signal::ctrl_c() => {
            signal.context("Failed to listen for Ctrl-C")?;
            info!("Interrupted, stopping load generation");
        }
    }

    Ok(())
}

fn print_usage(reason: &str) {
    println!("{}", reason.trim_end());
    println!();
    println!("{}", LoadgenArgs::command().render_usage());
}
