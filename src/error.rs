//! Error taxonomy shared by every materializer node.
//!
//! All pulling calls (`materialize_*`) report failures through a single
//! [`SequenceError`] so callers have exactly one error type to match on,
//! regardless of whether the failure came from index arithmetic, a
//! rejected concurrent claim, or a user-supplied callback.
//!
//! User callbacks passed to the `try_*` operators return [`anyhow::Result`].
//! Their failures are funnelled through [`from_callback`], which keeps the
//! original error reachable via [`std::error::Error::source`] and unwraps
//! errors that already are a [`SequenceError`] (for example a callback that
//! itself pulled from another sequence).

use thiserror::Error;

/// Result alias used by every node operation.
pub type Result<T> = std::result::Result<T, SequenceError>;

/// Failure raised while materializing a sequence.
#[derive(Debug, Error)]
pub enum SequenceError {
    /// An element was requested at an index that cannot be materialized.
    #[error("index {index} is out of bounds")]
    IndexOutOfBounds {
        /// The offending index.
        index: usize,
    },

    /// `materialize_next` was called on an exhausted iterator node.
    #[error("no more elements in sequence")]
    NoSuchElement,

    /// A one-time computation was claimed while another caller held the claim.
    #[error("concurrent materialization of {node}")]
    ConcurrentModification {
        /// Label of the node whose computation was already claimed.
        node: &'static str,
    },

    /// A user-supplied predicate, mapper, consumer or recovery callback failed.
    #[error("callback failed: {0}")]
    Callback(#[source] anyhow::Error),

    /// An index or size computation exceeded the representable range.
    #[error("index or size arithmetic overflow")]
    Overflow,

    /// An argument failed validation at construction time.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl SequenceError {
    /// Whether this error was raised by a user callback.
    ///
    /// Only these failures are intercepted by the exceptionally-recovering
    /// operators.
    pub fn is_callback(&self) -> bool {
        matches!(self, SequenceError::Callback(_))
    }

    /// Whether this error is a rejected concurrent claim.
    pub fn is_concurrent_modification(&self) -> bool {
        matches!(self, SequenceError::ConcurrentModification { .. })
    }
}

/// Convert a callback failure into a [`SequenceError`].
///
/// Errors that already wrap a `SequenceError` are returned as-is instead of
/// being wrapped a second time.
pub fn from_callback(err: anyhow::Error) -> SequenceError {
    match err.downcast::<SequenceError>() {
        Ok(inner) => inner,
        Err(other) => SequenceError::Callback(other),
    }
}

/// Fail with [`SequenceError::InvalidArgument`] unless `value > 0`.
pub fn require_positive(name: &str, value: usize) -> Result<usize> {
    if value == 0 {
        return Err(SequenceError::InvalidArgument(format!(
            "{name} must be positive, got {value}"
        )));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn callback_errors_keep_their_source() {
        let err = from_callback(anyhow::anyhow!("boom"));
        assert!(err.is_callback());
        assert_eq!(err.source().map(ToString::to_string).as_deref(), Some("boom"));
    }

    #[test]
    fn nested_sequence_errors_are_not_double_wrapped() {
        let err = from_callback(anyhow::Error::new(SequenceError::NoSuchElement));
        assert!(matches!(err, SequenceError::NoSuchElement));
    }

    #[test]
    fn zero_sizes_are_rejected() {
        assert!(require_positive("size", 0).is_err());
        assert_eq!(require_positive("size", 3).ok(), Some(3));
    }
}
