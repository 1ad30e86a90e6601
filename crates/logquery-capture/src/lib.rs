//! Tracing capture for logquery
//!
//! This crate bridges the host application's `tracing` subscriber to the
//! event buffer: [`CaptureLayer`] pushes every emitted event in as a raw
//! [`CapturedEvent`], and [`to_event_record`] normalizes raw records into
//! [`EventRecord`]s when a query reads them back.

mod layer;
mod record;

pub use layer::CaptureLayer;
pub use record::{CapturedEvent, to_event_record};

// Re-export types used in our public API
pub use logquery_engine::EventBuffer;
pub use logquery_types::EventRecord;
