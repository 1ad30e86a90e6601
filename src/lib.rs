//! In-process bounded log event buffer with a composable query engine.
//!
//! `logquery` retains the most recent N events emitted through `tracing`
//! and answers filtered, optionally-limited queries over them, together
//! with the time range the scan observed.
//!
//! ```
//! use logquery::{LogQuery, QueryFilter};
//! use tracing_subscriber::prelude::*;
//!
//! let query = LogQuery::new(1000)?;
//! tracing_subscriber::registry().with(query.layer()).init();
//!
//! tracing::warn!(disk = "sda1", "disk almost full");
//!
//! let recent = query.get_events(100);
//! assert_eq!(recent.events.len(), 1);
//!
//! let errors_only = QueryFilter {
//!     levels: ["ERROR".to_string()].into_iter().collect(),
//!     ..Default::default()
//! };
//! assert!(query.query_events(Some(&errors_only))?.events.is_empty());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::sync::Arc;

use tracing::debug;

pub use logquery_capture::{CaptureLayer, CapturedEvent, to_event_record};
pub use logquery_engine::{
    BufferedRecord, CapacityError, EventBuffer, FilterError, Predicate, filter_and_scan,
};
pub use logquery_types::{EventRecord, QueryFilter, QueryResult, SourceLocation};

/// The query service: owns the event buffer and the host identity, hands
/// out capture layers, and answers queries.
///
/// Clones share the same buffer.
#[derive(Clone)]
pub struct LogQuery {
    buffer: Arc<EventBuffer<CapturedEvent>>,
    host: String,
}

impl LogQuery {
    /// Create a service retaining at most `capacity` events, identified by
    /// the local host name.
    pub fn new(capacity: usize) -> Result<Self, CapacityError> {
        let host = hostname::get()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|_| "unknown".to_string());
        Self::with_host(capacity, host)
    }

    /// Create a service with an explicit host identity.
    pub fn with_host(capacity: usize, host: impl Into<String>) -> Result<Self, CapacityError> {
        Ok(Self {
            buffer: Arc::new(EventBuffer::new(capacity)?),
            host: host.into(),
        })
    }

    /// The capture layer feeding this service's buffer. Stack it onto the
    /// application's subscriber so emitted events become queryable.
    pub fn layer(&self) -> CaptureLayer {
        CaptureLayer::new(Arc::clone(&self.buffer))
    }

    /// Host identity stamped onto every returned event.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Number of events currently retained.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check if no events are retained.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Unfiltered fetch of up to `max_count` events, oldest first; a cap of
    /// 0 means unbounded.
    pub fn get_events(&self, max_count: usize) -> QueryResult {
        self.scan(None, max_count)
    }

    /// Filtered fetch. The result cap comes from the filter itself; an
    /// absent filter behaves like an unbounded unfiltered fetch.
    pub fn query_events(&self, filter: Option<&QueryFilter>) -> Result<QueryResult, FilterError> {
        let Some(filter) = filter else {
            return Ok(self.get_events(0));
        };
        let predicate = Predicate::compile(filter)?;
        Ok(self.scan(predicate.as_ref(), filter.max_results.unwrap_or(0)))
    }

    fn scan(&self, predicate: Option<&Predicate>, max_count: usize) -> QueryResult {
        let results = filter_and_scan(
            &self.buffer,
            |raw| to_event_record(raw, &self.host),
            predicate,
            max_count,
        );
        debug!(
            requested = max_count,
            returned = results.events.len(),
            buffered = self.buffer.len(),
            "log query served"
        );
        results
    }
}
