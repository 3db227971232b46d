//! Per-attempt publish outcomes.

use crate::error::{LoadgenTypesError, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Partition reported for an attempt that never reached the broker.
pub const FAILED_PARTITION: i32 = -1;

/// Offset reported for an attempt that never reached the broker.
pub const FAILED_OFFSET: i64 = -1;

const UNKNOWN_ERROR: &str = "unknown error";

/// Where the broker placed an acknowledged record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordLocation {
    pub partition: i32,
    pub offset: i64,
}

impl RecordLocation {
    pub fn new(partition: i32, offset: i64) -> Self {
        Self { partition, offset }
    }

    pub fn is_valid(&self) -> bool {
        self.partition >= 0 && self.offset >= 0
    }
}

/// Result of a single publish attempt.
///
/// Exactly one of these holds: the outcome carries a valid partition/offset
/// pair and no error message, or it carries the `-1/-1` sentinels and a
/// non-empty error message. The constructors are the only way to build one,
/// and nothing mutates it afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventOutcome {
    #[serde(rename = "ClientId")]
    client_id: String,
    #[serde(rename = "PartitionId")]
    partition_id: i32,
    #[serde(rename = "Offset")]
    offset: i64,
    #[serde(rename = "ExceptionMessage")]
    error_message: Option<String>,
    #[serde(rename = "Timestamp")]
    timestamp: DateTime<Utc>,
    #[serde(rename = "ElapsedMilliseconds")]
    elapsed_ms: u64,
}

impl EventOutcome {
    /// Outcome for an acknowledged record.
    ///
    /// Fails if the broker reported a negative partition or offset, since that
    /// would collide with the failure sentinels.
    pub fn success(
        client_id: impl Into<String>,
        location: RecordLocation,
        elapsed_ms: u64,
        timestamp: DateTime<Utc>,
    ) -> Result<Self> {
        if !location.is_valid() {
            return Err(LoadgenTypesError::InvalidLocation {
                partition: location.partition,
                offset: location.offset,
            });
        }
        Ok(Self {
            client_id: client_id.into(),
            partition_id: location.partition,
            offset: location.offset,
            error_message: None,
            timestamp,
            elapsed_ms,
        })
    }

    /// Outcome for an attempt that failed. An empty message is replaced so the
    /// failure is always visible in the telemetry record.
    pub fn failure(
        client_id: impl Into<String>,
        error_message: impl Into<String>,
        elapsed_ms: u64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let mut error_message = error_message.into();
        if error_message.trim().is_empty() {
            error_message = UNKNOWN_ERROR.to_string();
        }
        Self {
            client_id: client_id.into(),
            partition_id: FAILED_PARTITION,
            offset: FAILED_OFFSET,
            error_message: Some(error_message),
            timestamp,
            elapsed_ms,
        }
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn partition_id(&self) -> i32 {
        self.partition_id
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub fn is_success(&self) -> bool {
        self.error_message.is_none()
    }

    /// Location of the record, if the attempt succeeded.
    pub fn location(&self) -> Option<RecordLocation> {
        self.is_success()
            .then(|| RecordLocation::new(self.partition_id, self.offset))
    }
}

impl std::fmt::Display for EventOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} - event sent in {}ms - Partition: {}, Offset: {}, Error: {}",
            self.client_id,
            self.timestamp.format("%Y-%m-%d %H:%M:%S%.3f"),
            self.elapsed_ms,
            self.partition_id,
            self.offset,
            self.error_message.as_deref().unwrap_or("")
        )
    }
}

/// Encode a batch of outcomes as the JSON array sent to the telemetry stream.
pub fn encode_batch(batch: &[EventOutcome]) -> Result<String> {
    Ok(serde_json::to_string(batch)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap()
    }

    #[test]
    fn test_success_outcome_has_no_error() {
        let outcome =
            EventOutcome::success("client-a", RecordLocation::new(3, 1842), 41, ts()).unwrap();

        assert!(outcome.is_success());
        assert_eq!(outcome.partition_id(), 3);
        assert_eq!(outcome.offset(), 1842);
        assert_eq!(outcome.error_message(), None);
        assert_eq!(outcome.location(), Some(RecordLocation::new(3, 1842)));
    }

    #[test]
    fn test_success_rejects_sentinel_location() {
        let err = EventOutcome::success("client-a", RecordLocation::new(-1, 10), 5, ts())
            .unwrap_err();
        assert!(matches!(
            err,
            LoadgenTypesError::InvalidLocation {
                partition: -1,
                offset: 10
            }
        ));
    }

    #[test]
    fn test_failure_outcome_uses_sentinels() {
        let outcome = EventOutcome::failure("client-a", "Broker: Not enough replicas", 12, ts());

        assert!(!outcome.is_success());
        assert_eq!(outcome.partition_id(), FAILED_PARTITION);
        assert_eq!(outcome.offset(), FAILED_OFFSET);
        assert_eq!(outcome.error_message(), Some("Broker: Not enough replicas"));
        assert_eq!(outcome.location(), None);
    }

    #[test]
    fn test_failure_with_blank_message_is_still_flagged() {
        let outcome = EventOutcome::failure("client-a", "  ", 0, ts());
        assert_eq!(outcome.error_message(), Some(UNKNOWN_ERROR));
    }

    #[test]
    fn test_json_field_names_and_order() {
        let outcome =
            EventOutcome::success("client-a", RecordLocation::new(0, 7), 250, ts()).unwrap();
        let json = encode_batch(&[outcome]).unwrap();

        assert_eq!(
            json,
            r#"[{"ClientId":"client-a","PartitionId":0,"Offset":7,"ExceptionMessage":null,"Timestamp":"2024-05-01T10:00:00Z","ElapsedMilliseconds":250}]"#
        );
    }

    #[test]
    fn test_json_failure_entry() {
        let outcome = EventOutcome::failure("client-b", "timed out", 1003, ts());
        let value: serde_json::Value =
            serde_json::from_str(&encode_batch(&[outcome]).unwrap()).unwrap();

        let entry = &value[0];
        assert_eq!(entry["PartitionId"], -1);
        assert_eq!(entry["Offset"], -1);
        assert_eq!(entry["ExceptionMessage"], "timed out");
        assert_eq!(entry["ElapsedMilliseconds"], 1003);
    }

    #[test]
    fn test_empty_batch_encodes_as_empty_array() {
        assert_eq!(encode_batch(&[]).unwrap(), "[]");
    }

    #[test]
    fn test_display_line() {
        let client_id = uuid::Uuid::new_v4().to_string();
        let outcome = EventOutcome::failure(client_id.as_str(), "boom", 9, ts());
        assert_eq!(
            outcome.to_string(),
            format!(
                "{client_id} 2024-05-01 10:00:00.000 - event sent in 9ms - Partition: -1, Offset: -1, Error: boom"
            )
        );
    }
}
