//! Event Hubs connection strings and the Kafka client settings derived from them.

use anyhow::Context;
use rdkafka::ClientConfig;
use std::str::FromStr;
use std::time::Duration;

/// Port of the Kafka-compatible endpoint exposed by an Event Hubs namespace.
pub const KAFKA_ENDPOINT_PORT: u16 = 9093;

/// SASL username Event Hubs expects when the password is a connection string.
const SASL_USERNAME: &str = "$ConnectionString";

/// A parsed `Endpoint=sb://...;SharedAccessKeyName=...;SharedAccessKey=...;EntityPath=...`
/// connection string.
///
/// The raw string is kept because it doubles as the SASL password. It is
/// never shown by `Debug` or `Display`.
#[derive(Clone, PartialEq, Eq)]
pub struct EventHubConnection {
    raw: String,
    fully_qualified_namespace: String,
    event_hub_name: String,
}

impl EventHubConnection {
    pub fn parse(connection_string: &str) -> anyhow::Result<Self> {
        let raw = connection_string.trim();
        let mut endpoint = None;
        let mut entity_path = None;

        for segment in raw.split(';').map(str::trim).filter(|s| !s.is_empty()) {
            let (key, value) = segment.split_once('=').with_context(|| {
                format!(
                    "Malformed connection string segment '{}'",
                    segment_name(segment)
                )
            })?;
            match key.trim().to_ascii_lowercase().as_str() {
                "endpoint" => endpoint = Some(value.trim()),
                "entitypath" => entity_path = Some(value.trim()),
                _ => {}
            }
        }

        let endpoint = endpoint.context("Connection string is missing 'Endpoint'")?;
        let fully_qualified_namespace = host_from_endpoint(endpoint)
            .with_context(|| format!("Connection string endpoint '{endpoint}' has no host"))?;
        let event_hub_name = entity_path
            .filter(|p| !p.is_empty())
            .context("Connection string is missing 'EntityPath'")?;

        Ok(Self {
            raw: raw.to_string(),
            fully_qualified_namespace: fully_qualified_namespace.to_string(),
            event_hub_name: event_hub_name.to_string(),
        })
    }

    pub fn fully_qualified_namespace(&self) -> &str {
        &self.fully_qualified_namespace
    }

    /// The event hub, used as the Kafka topic.
    pub fn event_hub_name(&self) -> &str {
        &self.event_hub_name
    }

    pub fn bootstrap_servers(&self) -> String {
        format!("{}:{KAFKA_ENDPOINT_PORT}", self.fully_qualified_namespace)
    }

    /// Producer configuration for the namespace's Kafka endpoint.
    pub fn client_config(&self, message_timeout: Duration) -> ClientConfig {
        let mut config = ClientConfig::new();
        config
            .set("bootstrap.servers", self.bootstrap_servers())
            .set("security.protocol", "SASL_SSL")
            .set("sasl.mechanism", "PLAIN")
            .set("sasl.username", SASL_USERNAME)
            .set("sasl.password", &self.raw)
            .set("acks", "all")
            .set("message.timeout.ms", message_timeout.as_millis().to_string());
        config
    }
}

impl FromStr for EventHubConnection {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for EventHubConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.fully_qualified_namespace, self.event_hub_name)
    }
}

impl std::fmt::Debug for EventHubConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventHubConnection")
            .field("fully_qualified_namespace", &self.fully_qualified_namespace)
            .field("event_hub_name", &self.event_hub_name)
            .finish_non_exhaustive()
    }
}

/// `sb://ns.servicebus.windows.net/` -> `ns.servicebus.windows.net`
fn host_from_endpoint(endpoint: &str) -> Option<&str> {
    let rest = endpoint
        .find("://")
        .map(|p| &endpoint[p + 3..])
        .unwrap_or(endpoint);
    let host = rest.split(['/', ':']).next().unwrap_or_default().trim();
    (!host.is_empty()).then_some(host)
}

/// Key part of a segment, so errors never echo a secret value.
fn segment_name(segment: &str) -> &str {
    segment.split('=').next().unwrap_or_default()
}
