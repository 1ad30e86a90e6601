//! Shared types for logquery
//!
//! This crate contains the data structures exchanged between the event
//! buffer, the query engine, and the host service layer.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Normalized snapshot of one log occurrence.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Capture time in milliseconds since the Unix epoch
    pub timestamp_millis: i64,

    /// Ordering tiebreaker; equals `timestamp_millis` at construction
    pub sequence: i64,

    /// Severity label, absent if unknown
    pub level: Option<String>,

    /// Logger/target name
    pub logger: String,

    /// Rendered message
    pub message: Option<String>,

    /// Name of the producing thread
    pub thread: String,

    /// Host identity, stamped at conversion time by the service layer
    pub host: String,

    /// Call-site information, present only when it was captured at the
    /// moment the originating record was appended
    pub source: Option<SourceLocation>,

    /// Rendered stack frames, present only when the originating record
    /// carried error information
    pub exception: Option<Vec<String>>,

    /// Contextual key/value pairs attached to the originating record
    pub properties: HashMap<String, String>,
}

impl EventRecord {
    /// Create a record with the given capture time and logger name.
    /// `sequence` starts out equal to the timestamp.
    pub fn new(timestamp_millis: i64, logger: impl Into<String>) -> Self {
        Self {
            timestamp_millis,
            sequence: timestamp_millis,
            level: None,
            logger: logger.into(),
            message: None,
            thread: String::new(),
            host: String::new(),
            source: None,
            exception: None,
            properties: HashMap::new(),
        }
    }
}

/// Call-site information for one event.
///
/// The four components are either all known or all unknown, which is why
/// they live behind a single `Option` on [`EventRecord`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SourceLocation {
    pub class: String,
    pub file: String,
    pub method: String,
    pub line: String,
}

/// Request-scoped filter describing which events a query should return.
///
/// Every field is optional; a default filter constrains nothing.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryFilter {
    /// Levels to include; empty means no level constraint.
    /// Membership is an exact, case-sensitive string match.
    pub levels: HashSet<String>,

    /// Only events strictly earlier than this instant (epoch millis)
    pub before_timestamp: Option<i64>,

    /// Only events strictly later than this instant (epoch millis)
    pub after_timestamp: Option<i64>,

    /// Regex pattern matched against the event message
    pub matches_text: Option<String>,

    /// Result cap; `None` or `Some(0)` means unbounded
    pub max_results: Option<usize>,
}

/// Result of one query: the matched events plus the time range the scan
/// actually examined.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct QueryResult {
    /// Matched events in scan order, oldest to newest
    pub events: Vec<EventRecord>,

    /// Smallest timestamp examined during the scan, matched or not;
    /// absent when nothing was scanned
    pub from_timestamp: Option<i64>,

    /// Largest timestamp examined during the scan
    pub to_timestamp: Option<i64>,
}
