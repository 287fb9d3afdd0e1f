//! Error surface raised before any kernel executes.

use ndstride::DType;
use thiserror::Error;

/// Failure modes of the indexed operations.
///
/// Both variants are raised synchronously during validation; no partial
/// mutation of the destination occurs on failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndexOpError {
    /// Rank, axis, or off-axis size violation.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The element type cannot serve the requested operation (accumulation
    /// on booleans, for example).
    #[error("{op} does not support dtype {dtype:?}")]
    UnsupportedType { op: &'static str, dtype: DType },
}

impl IndexOpError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        IndexOpError::InvalidArgument(message.into())
    }

    pub(crate) fn unsupported(op: &'static str, dtype: DType) -> Self {
        IndexOpError::UnsupportedType { op, dtype }
    }
}

/// Convenience alias for results returned by the indexed operations.
pub type Result<T> = std::result::Result<T, IndexOpError>;
