use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One observed load-test transaction
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Record {
    /// Target URL the request was made against
    pub url: String,

    /// HTTP method used
    pub method: String,

    /// Numeric status code of the response
    pub status: u16,

    /// Error message, if the transaction failed
    pub error: Option<String>,

    /// Response size in bytes
    pub size: u64,

    /// Transaction duration in nanoseconds
    pub duration: u64,

    /// When the transaction was observed
    pub timestamp: DateTime<Utc>,
}

impl Record {
    /// Whether this record carries enough data to be written.
    ///
    /// A record without a URL, method, or timestamp never reaches the
    /// network; the collector rejects it before buffering.
    pub fn is_complete(&self) -> bool {
        !self.url.is_empty() && !self.method.is_empty() && self.timestamp != DateTime::UNIX_EPOCH
    }
}

impl Default for Record {
    fn default() -> Self {
        Self {
            url: String::new(),
            method: String::new(),
            status: 0,
            error: None,
            size: 0,
            duration: 0,
            timestamp: DateTime::UNIX_EPOCH,
        }
    }
}

/// A record paired with the logical index it should be written to
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IndexedRecord {
    pub record: Record,
    pub index: String,
}

impl IndexedRecord {
    pub fn new(record: Record, index: impl Into<String>) -> Self {
        Self {
            record,
            index: index.into(),
        }
    }
}
