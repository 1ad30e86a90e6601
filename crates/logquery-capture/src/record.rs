use std::collections::HashMap;

use logquery_engine::BufferedRecord;
use logquery_types::{EventRecord, SourceLocation};

/// Raw record built from one tracing event, before normalization.
///
/// Call-site metadata is borrowed from the event's static metadata; the
/// thread name is resolved by [`materialize`](BufferedRecord::materialize)
/// while the record is still on the producing thread.
#[derive(Clone, Debug)]
pub struct CapturedEvent {
    pub timestamp_millis: i64,
    pub level: &'static str,
    pub target: String,
    pub message: Option<String>,
    pub thread: String,
    pub module: Option<&'static str>,
    pub file: Option<&'static str>,
    pub line: Option<u32>,
    pub span: Option<&'static str>,
    pub exception: Option<Vec<String>>,
    pub properties: HashMap<String, String>,
}

impl BufferedRecord for CapturedEvent {
    fn timestamp_millis(&self) -> i64 {
        self.timestamp_millis
    }

    fn materialize(&mut self) {
        // The producing thread is only identifiable while we are still on
        // it; a query thread reading this record later cannot recover it.
        if self.thread.is_empty() {
            self.thread = current_thread_name();
        }
    }
}

fn current_thread_name() -> String {
    let current = std::thread::current();
    match current.name() {
        Some(name) => name.to_string(),
        None => format!("{:?}", current.id()),
    }
}

/// Convert a captured raw record into a normalized [`EventRecord`],
/// stamping the given host identity.
///
/// This is the conversion seam the query engine scans through; other
/// logging backends may plug in their own converter, including one that
/// returns `None` for records it cannot normalize.
///
/// Call-site fields are all-or-nothing: `source` is populated only when
/// module, file, and line were all captured. The innermost span name stands
/// in for the method component, which Rust call sites do not expose.
pub fn to_event_record(raw: &CapturedEvent, host: &str) -> Option<EventRecord> {
    let mut record = EventRecord::new(raw.timestamp_millis, raw.target.clone());
    record.level = Some(raw.level.to_string());
    record.message = raw.message.clone();
    record.thread = raw.thread.clone();
    record.host = host.to_string();
    if let (Some(module), Some(file), Some(line)) = (raw.module, raw.file, raw.line) {
        record.source = Some(SourceLocation {
            class: module.to_string(),
            file: file.to_string(),
            method: raw.span.unwrap_or(module).to_string(),
            line: line.to_string(),
        });
    }
    record.exception = raw.exception.clone();
    record.properties = raw.properties.clone();
    Some(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw() -> CapturedEvent {
        CapturedEvent {
            timestamp_millis: 1234,
            level: "WARN",
            target: "app::net".to_string(),
            message: Some("connection reset".to_string()),
            thread: "worker-1".to_string(),
            module: Some("app::net"),
            file: Some("src/net.rs"),
            line: Some(42),
            span: Some("handle_request"),
            exception: None,
            properties: HashMap::new(),
        }
    }

    #[test]
    fn conversion_stamps_host_and_sequence() {
        let record = to_event_record(&raw(), "node-7").unwrap();
        assert_eq!(record.host, "node-7");
        assert_eq!(record.sequence, 1234);
        assert_eq!(record.level.as_deref(), Some("WARN"));
        assert_eq!(record.logger, "app::net");
        assert_eq!(record.thread, "worker-1");
    }

    #[test]
    fn source_is_all_or_nothing() {
        let record = to_event_record(&raw(), "host").unwrap();
        let source = record.source.expect("full call-site data was captured");
        assert_eq!(source.class, "app::net");
        assert_eq!(source.file, "src/net.rs");
        assert_eq!(source.method, "handle_request");
        assert_eq!(source.line, "42");

        let mut partial = raw();
        partial.line = None;
        let record = to_event_record(&partial, "host").unwrap();
        assert!(record.source.is_none());
    }

    #[test]
    fn materialize_fills_thread_name_once() {
        let mut record = raw();
        record.thread = String::new();
        record.materialize();
        assert!(!record.thread.is_empty());

        let mut named = raw();
        named.materialize();
        assert_eq!(named.thread, "worker-1");
    }
}
