//! Bounded event buffering and querying for logquery
//!
//! This crate provides the fixed-capacity ring buffer, predicate
//! compilation, and the single-pass scan/filter/limit engine.

mod buffer;
mod error;
mod filter;
mod query;

pub use buffer::{BufferedRecord, EventBuffer};
pub use error::{CapacityError, FilterError};
pub use filter::Predicate;
pub use query::filter_and_scan;

// Re-export types used in our public API
pub use logquery_types::{EventRecord, QueryFilter, QueryResult};
