use logquery_types::{EventRecord, QueryResult};

use crate::buffer::{BufferedRecord, EventBuffer};
use crate::filter::Predicate;

/// Scan the buffer oldest to newest, converting each raw record and
/// applying an optional predicate and result cap.
///
/// The from/to envelope of the result covers every record *examined*,
/// matched or not, so callers can tell what time window was looked at
/// independently of what matched. A cap-triggered early exit stops the scan
/// and therefore also truncates the envelope; bounded latency wins over
/// envelope completeness there.
///
/// `convert` may return `None` for a slot the backend cannot normalize;
/// such a slot still widens the envelope from its raw timestamp but is
/// never matched.
pub fn filter_and_scan<R, C>(
    buffer: &EventBuffer<R>,
    convert: C,
    predicate: Option<&Predicate>,
    max_count: usize,
) -> QueryResult
where
    R: BufferedRecord + Clone,
    C: Fn(&R) -> Option<EventRecord>,
{
    let mut matched = 0usize;
    let mut from: Option<i64> = None;
    let mut to: Option<i64> = None;
    let mut events = Vec::new();

    for index in 0..buffer.len() {
        let raw = buffer.get(index);
        let timestamp = raw.timestamp_millis();
        from = Some(from.map_or(timestamp, |earliest| earliest.min(timestamp)));
        to = Some(to.map_or(timestamp, |latest| latest.max(timestamp)));

        let Some(event) = convert(&raw) else {
            continue;
        };
        if predicate.is_none_or(|predicate| predicate.matches(&event)) {
            events.push(event);
            matched += 1;
            if max_count > 0 && matched >= max_count {
                break;
            }
        }
    }

    QueryResult {
        events,
        from_timestamp: from,
        to_timestamp: to,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logquery_types::QueryFilter;

    #[derive(Clone)]
    struct Raw {
        timestamp: i64,
        level: &'static str,
        convertible: bool,
    }

    impl BufferedRecord for Raw {
        fn timestamp_millis(&self) -> i64 {
            self.timestamp
        }
    }

    fn convert(raw: &Raw) -> Option<EventRecord> {
        if !raw.convertible {
            return None;
        }
        let mut record = EventRecord::new(raw.timestamp, "test");
        record.level = Some(raw.level.to_string());
        record
            .properties
            .insert("source".to_string(), "unit".to_string());
        Some(record)
    }

    fn buffer_with(timestamps: &[i64]) -> EventBuffer<Raw> {
        let buffer = EventBuffer::new(timestamps.len().max(1)).unwrap();
        for &timestamp in timestamps {
            buffer.push(Raw {
                timestamp,
                level: "INFO",
                convertible: true,
            });
        }
        buffer
    }

    #[test]
    fn envelope_covers_all_scanned_records() {
        let buffer = buffer_with(&[10, 5, 20]);
        let result = filter_and_scan(&buffer, convert, None, 0);
        assert_eq!(result.events.len(), 3);
        assert_eq!(result.from_timestamp, Some(5));
        assert_eq!(result.to_timestamp, Some(20));
    }

    #[test]
    fn cap_truncates_scan_and_envelope() {
        let buffer = buffer_with(&[1, 2, 3, 4, 5]);
        let result = filter_and_scan(&buffer, convert, None, 2);
        assert_eq!(result.events.len(), 2);
        assert_eq!(result.events[0].timestamp_millis, 1);
        assert_eq!(result.events[1].timestamp_millis, 2);
        // The scan stopped at the cap, so the envelope ends there too
        assert_eq!(result.to_timestamp, Some(2));
    }

    #[test]
    fn empty_buffer_yields_empty_result_without_envelope() {
        let buffer: EventBuffer<Raw> = EventBuffer::new(4).unwrap();
        let result = filter_and_scan(&buffer, convert, None, 0);
        assert!(result.events.is_empty());
        assert_eq!(result.from_timestamp, None);
        assert_eq!(result.to_timestamp, None);
    }

    #[test]
    fn unmatched_records_still_widen_envelope() {
        let buffer = EventBuffer::new(3).unwrap();
        buffer.push(Raw {
            timestamp: 50,
            level: "INFO",
            convertible: true,
        });
        buffer.push(Raw {
            timestamp: 250,
            level: "ERROR",
            convertible: true,
        });
        let filter = QueryFilter {
            levels: ["ERROR".to_string()].into_iter().collect(),
            ..Default::default()
        };
        let predicate = Predicate::compile(&filter).unwrap();
        let result = filter_and_scan(&buffer, convert, predicate.as_ref(), 0);
        assert_eq!(result.events.len(), 1);
        assert_eq!(result.events[0].timestamp_millis, 250);
        // The INFO record did not match but was examined
        assert_eq!(result.from_timestamp, Some(50));
        assert_eq!(result.to_timestamp, Some(250));
    }

    #[test]
    fn conversion_gap_skips_matching_but_not_envelope() {
        let buffer = EventBuffer::new(3).unwrap();
        buffer.push(Raw {
            timestamp: 5,
            level: "INFO",
            convertible: false,
        });
        buffer.push(Raw {
            timestamp: 30,
            level: "INFO",
            convertible: true,
        });
        let result = filter_and_scan(&buffer, convert, None, 0);
        assert_eq!(result.events.len(), 1);
        assert_eq!(result.events[0].timestamp_millis, 30);
        assert_eq!(result.from_timestamp, Some(5));
        assert_eq!(result.to_timestamp, Some(30));
    }
}
