use thiserror::Error;

/// Failure of a single next-occurrence calculation.
///
/// Both variants are deterministic: retrying with the same inputs fails the
/// same way. Callers rendering a view should treat either as "no next
/// occurrence" rather than aborting.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecurrenceError {
    #[error("invalid recurrence pattern: {0}")]
    InvalidPattern(String),
    #[error("recurrence did not pass the reference date within {cap} steps")]
    IterationCapExceeded { cap: usize },
    #[error("next occurrence falls outside the supported date range")]
    OutOfRange,
}

impl RecurrenceError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        RecurrenceError::InvalidPattern(message.into())
    }
}

pub type RecurrenceResult<T> = Result<T, RecurrenceError>;
