use std::collections::VecDeque;

use parking_lot::RwLock;

use crate::error::CapacityError;

/// A record the buffer can hold.
pub trait BufferedRecord {
    /// Capture time in milliseconds since the Unix epoch.
    fn timestamp_millis(&self) -> i64;

    /// Called exactly once, synchronously, as the record enters the buffer.
    ///
    /// Derived data whose source goes away after the fact (call-site
    /// inspection, the producing thread's name) must be captured here,
    /// never lazily at query time.
    fn materialize(&mut self) {}
}

/// Thread-safe, fixed-capacity FIFO-eviction store of log records.
///
/// One writer and any number of readers may operate concurrently; each push
/// and each single read holds the lock for the duration of that operation
/// only. A scan over the buffer is a sequence of per-slot reads and may miss
/// pushes that land mid-scan.
pub struct EventBuffer<R> {
    /// Internal storage, oldest at the front
    entries: RwLock<VecDeque<R>>,

    /// Maximum capacity, fixed at construction
    capacity: usize,
}

impl<R: BufferedRecord> EventBuffer<R> {
    /// Create a buffer retaining at most `capacity` records.
    pub fn new(capacity: usize) -> Result<Self, CapacityError> {
        if capacity == 0 {
            return Err(CapacityError);
        }
        Ok(Self {
            entries: RwLock::new(VecDeque::with_capacity(capacity)),
            capacity,
        })
    }

    /// Push a record, evicting the single oldest entry if at capacity.
    ///
    /// The record is materialized before it becomes visible to readers.
    pub fn push(&self, mut record: R) {
        record.materialize();
        let mut entries = self.entries.write();
        if entries.len() >= self.capacity {
            entries.pop_front();
        }
        entries.push_back(record);
    }

    /// Current record count, `0..=capacity`.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Check if the buffer holds no records.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Maximum number of retained records.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<R: Clone> EventBuffer<R> {
    /// Read the `index`-th oldest retained record.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`. An out-of-range read is a contract
    /// violation by the caller, not a runtime condition, and is never
    /// clamped or swallowed.
    pub fn get(&self, index: usize) -> R {
        self.entries.read()[index].clone()
    }
}
