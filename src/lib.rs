//! eventhub-loadgen library
//!
//! Synthetic load generator for Azure Event Hubs (via its Kafka endpoint) that
//! reports its own producer-side latency to a second event hub.
//!
//! The producer loop lives in `loadgen_producer`; this crate holds the
//! process-level plumbing: connection string parsing, broker client settings
//! and command-line configuration.
//!
//! # CLI Usage
//!
//! ```bash
//! eventhub-loadgen \
//!   "Endpoint=sb://data-ns.servicebus.windows.net/;SharedAccessKeyName=send;SharedAccessKey=...;EntityPath=vehicles" \
//!   "Endpoint=sb://tel-ns.servicebus.windows.net/;SharedAccessKeyName=send;SharedAccessKey=...;EntityPath=telemetry"
//! ```

pub mod config;
pub mod connect;

pub use config::{LoadgenArgs, LoadgenConfig};
pub use connect::EventHubConnection;
