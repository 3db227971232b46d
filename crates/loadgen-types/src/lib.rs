//! Shared types for eventhub-loadgen.
//!
//! An [`EventOutcome`] is the result of one publish attempt against the data
//! stream. Outcomes are accumulated and shipped to the telemetry stream as a
//! JSON array; [`encode_batch`] produces that array.
//!
//! ## Wire format
//!
//! ```json
//! [
//!   {
//!     "ClientId": "0b6f...",
//!     "PartitionId": 3,
//!     "Offset": 1842,
//!     "ExceptionMessage": null,
//!     "Timestamp": "2024-05-01T10:00:00.123Z",
//!     "ElapsedMilliseconds": 41
//!   }
//! ]
//! ```

pub mod error;
pub mod outcome;

pub use error::{LoadgenTypesError, Result};
pub use outcome::{encode_batch, EventOutcome, RecordLocation, FAILED_OFFSET, FAILED_PARTITION};
