//! Domain error model.

use thiserror::Error;

/// Domain-level error.
///
/// Raised only at the edges (parsing identifiers). The authorization
/// decisions themselves are total and never produce one.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }
}
