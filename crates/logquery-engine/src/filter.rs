use std::collections::HashSet;

use regex::Regex;

use logquery_types::{EventRecord, QueryFilter};

use crate::error::FilterError;

/// A compiled boolean test over one [`EventRecord`].
///
/// The atoms form a closed set mirroring the filter fields; conjunctions are
/// an explicit AND list so each atom stays independently testable.
#[derive(Clone, Debug)]
pub enum Predicate {
    /// Level is present and a member of the set (exact, case-sensitive)
    Levels(HashSet<String>),

    /// Timestamp is strictly earlier than the given instant
    Before(i64),

    /// Timestamp is strictly later than the given instant
    After(i64),

    /// Message is present and matches the pattern
    TextMatch(Regex),

    /// Short-circuiting conjunction, evaluated in list order
    And(Vec<Predicate>),
}

impl Predicate {
    /// Compile a filter into a predicate.
    ///
    /// Returns `Ok(None)` when the filter constrains nothing, so an
    /// unconstrained query never pays for a trivial match loop. Atoms are
    /// collected in the fixed order levels, before, after, text.
    pub fn compile(filter: &QueryFilter) -> Result<Option<Self>, FilterError> {
        let mut atoms = Vec::new();

        if !filter.levels.is_empty() {
            atoms.push(Predicate::Levels(filter.levels.clone()));
        }
        if let Some(before) = filter.before_timestamp {
            atoms.push(Predicate::Before(before));
        }
        if let Some(after) = filter.after_timestamp {
            atoms.push(Predicate::After(after));
        }
        if let Some(pattern) = filter.matches_text.as_deref()
            && !pattern.is_empty()
        {
            atoms.push(Predicate::TextMatch(Regex::new(pattern)?));
        }

        Ok(match atoms.len() {
            0 => None,
            1 => atoms.pop(),
            _ => Some(Predicate::And(atoms)),
        })
    }

    /// Test one record against this predicate.
    pub fn matches(&self, event: &EventRecord) -> bool {
        match self {
            Predicate::Levels(levels) => event
                .level
                .as_deref()
                .is_some_and(|level| levels.contains(level)),
            Predicate::Before(instant) => event.timestamp_millis < *instant,
            Predicate::After(instant) => event.timestamp_millis > *instant,
            Predicate::TextMatch(pattern) => event
                .message
                .as_deref()
                .is_some_and(|message| pattern.is_match(message)),
            Predicate::And(atoms) => atoms.iter().all(|atom| atom.matches(event)),
        }
    }
}
