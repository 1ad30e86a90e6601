use thiserror::Error;

/// Rejected buffer configuration: capacity must be positive.
#[derive(Debug, Error)]
#[error("buffer capacity must be greater than zero")]
pub struct CapacityError;

/// A query filter could not be compiled into a predicate.
#[derive(Debug, Error)]
pub enum FilterError {
    /// The text-match pattern is not a valid regex
    #[error("invalid text match pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}
