//! Line protocol encoding for load-test records.
//!
//! The backend parses these lines positionally: tag order, field order and
//! the absence of extra whitespace are part of the wire contract, not a
//! formatting choice.

use crate::record::{IndexedRecord, Record};

/// Measurement name under which every record is written
pub const MEASUREMENT: &str = "request";

/// Encode a single record as one line protocol point.
///
/// Shape: `request,url=<url>,method=<method>,status=<status>,error=<bool>
/// size=<size>,duration=<duration> <unix_nanos>`. Only the presence of an
/// error is serialized, not its content.
pub fn encode(record: &Record) -> String {
    format!(
        "{},url={},method={},status={},error={} size={},duration={} {}",
        MEASUREMENT,
        record.url,
        record.method,
        record.status,
        record.error.is_some(),
        record.size,
        record.duration,
        record.timestamp.timestamp_nanos_opt().unwrap_or(0),
    )
}

/// Encode a queue of mappings as a single newline-joined write body
pub fn encode_batch(mappings: &[IndexedRecord]) -> String {
    mappings
        .iter()
        .map(|m| encode(&m.record))
        .collect::<Vec<_>>()
        .join("\n")
}
