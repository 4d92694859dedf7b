//! Errors surfaced by the retrieval engine.

#![warn(clippy::all, rust_2018_idioms)]

use std::time::Duration;

/// Failure of a retrieval operation.
///
/// Validation variants are raised before any remote call is issued. Errors from the
/// remote service pass through [`RetrievalError::Remote`] untouched, so their message and
/// source chain are exactly what the transport produced.
#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    #[error("{0} must not be empty")]
    EmptyIdentifier(&'static str),

    #[error("invalid time range: end {end} is before start {start}")]
    InvalidRange { start: i64, end: i64 },

    #[error("pagination cancelled after {pages} page(s)")]
    Cancelled { pages: usize },

    #[error("page fetch timed out after {0:?}")]
    Timeout(Duration),

    #[error("pagination stopped at the limit of {0} page(s)")]
    PageLimit(usize),

    #[error(transparent)]
    Remote(#[from] anyhow::Error),
}

impl RetrievalError {
    /// True for errors raised before talking to the remote service
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            RetrievalError::EmptyIdentifier(_) | RetrievalError::InvalidRange { .. }
        )
    }
}
