//! In-memory sink for exercising the producer loop without a broker.

use crate::error::SinkError;
use crate::sink::RecordSink;
use async_trait::async_trait;
use loadgen_types::RecordLocation;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

/// Scripted reply for one `send` call.
#[derive(Debug, Clone)]
pub struct SinkResponse {
    delay: Duration,
    failure: Option<String>,
}

impl SinkResponse {
    pub fn ack_after(delay_ms: u64) -> Self {
        Self {
            delay: Duration::from_millis(delay_ms),
            failure: None,
        }
    }

    pub fn fail_after(delay_ms: u64, message: impl Into<String>) -> Self {
        Self {
            delay: Duration::from_millis(delay_ms),
            failure: Some(message.into()),
        }
    }
}

/// A record acknowledged by [`MemorySink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentRecord {
    pub topic: String,
    pub key: String,
    pub payload: Vec<u8>,
    pub location: RecordLocation,
}

/// Sink that replays scripted responses, then acknowledges instantly.
///
/// Acknowledged records land on partition 0 with increasing offsets.
#[derive(Debug, Default)]
pub struct MemorySink {
    script: Mutex<VecDeque<SinkResponse>>,
    records: Mutex<Vec<SentRecord>>,
    attempts: Mutex<u64>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_script(responses: impl IntoIterator<Item = SinkResponse>) -> Self {
        Self {
            script: Mutex::new(responses.into_iter().collect()),
            ..Self::default()
        }
    }

    /// Append more scripted responses.
    pub fn push(&self, response: SinkResponse) {
        lock(&self.script).push_back(response);
    }

    pub fn records(&self) -> Vec<SentRecord> {
        lock(&self.records).clone()
    }

    pub fn attempts(&self) -> u64 {
        *lock(&self.attempts)
    }
}

#[async_trait]
impl RecordSink for MemorySink {
    async fn send(
        &self,
        topic: &str,
        key: &str,
        payload: &[u8],
    ) -> Result<RecordLocation, SinkError> {
        *lock(&self.attempts) += 1;
        let response = lock(&self.script)
            .pop_front()
            .unwrap_or_else(|| SinkResponse::ack_after(0));

        if !response.delay.is_zero() {
            tokio::time::sleep(response.delay).await;
        }

        if let Some(message) = response.failure {
            return Err(SinkError::Rejected(message));
        }

        let mut records = lock(&self.records);
        let location = RecordLocation::new(0, records.len() as i64);
        records.push(SentRecord {
            topic: topic.to_string(),
            key: key.to_string(),
            payload: payload.to_vec(),
            location,
        });
        Ok(location)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
