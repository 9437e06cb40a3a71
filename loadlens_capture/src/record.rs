//! Canonical representation of a result file line
//!
//! One [`Record`] is one observed request outcome. Records are never mutated
//! after decoding; every aggregate is derived from borrowed slices of them.

use serde::{Deserialize, Serialize};

/// Lower bound, inclusive, of the status codes counted as success.
pub const SUCCESS_LOWER: u16 = 200;
/// Upper bound, exclusive, of the status codes counted as success.
pub const SUCCESS_UPPER: u16 = 300;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// The structure of a result file line.
pub struct Record {
    /// The order in which the load generator issued this request. Not
    /// guaranteed to be contiguous.
    #[serde(rename = "seq")]
    pub sequence: u64,
    /// The status code returned by the target. Load generators record
    /// transport failures as code 0.
    #[serde(rename = "code")]
    pub status_code: u16,
    /// Observed round-trip latency in nanoseconds.
    #[serde(rename = "latency")]
    pub latency_nanos: u64,
    /// When the request was issued. Carried through, never interpreted.
    pub timestamp: String,
}

impl Record {
    /// Whether this record's status code is in the 2xx range.
    #[must_use]
    pub fn is_success(&self) -> bool {
        is_success(self.status_code)
    }

    /// Latency converted to milliseconds.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn latency_millis(&self) -> f64 {
        self.latency_nanos as f64 / 1e6
    }
}

/// Whether `code` is in the half-open success range [200, 300).
#[must_use]
pub fn is_success(code: u16) -> bool {
    (SUCCESS_LOWER..SUCCESS_UPPER).contains(&code)
}
