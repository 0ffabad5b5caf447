//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Only deterministic failures of portal input belong here (bad drafts,
/// malformed identifiers). Tier access checks never produce one of these:
/// unknown tiers resolve to Free Member instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. an empty title on a content draft).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A tier name could not be parsed strictly.
    #[error("unknown membership tier: '{0}'")]
    UnknownTier(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn unknown_tier(raw: impl Into<String>) -> Self {
        Self::UnknownTier(raw.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }
}
