//! Error types shared across the ticketing engines.
//!
//! Three recoverable failure kinds cover every engine operation. All of
//! them propagate unchanged to the caller; the front end renders a message
//! and keeps its interaction loop alive.

use thiserror::Error;

/// Result type for ticketing operations.
pub type TicketingResult<T> = Result<T, TicketingError>;

/// Failures an engine operation can report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TicketingError {
    /// Actor/role mismatch, ownership mismatch, inactive actor, or a
    /// failed eligibility check.
    #[error("access denied: {0}")]
    AccessDenied(String),

    /// A referenced entity id is absent from the store.
    #[error("not found: {0}")]
    NotFound(String),

    /// A well-formed request violates a domain invariant.
    #[error("validation failed: {0}")]
    Validation(String),
}

impl TicketingError {
    /// Build an `AccessDenied` from anything string-like.
    pub fn denied(msg: impl Into<String>) -> Self {
        Self::AccessDenied(msg.into())
    }

    /// Build a `NotFound` from anything string-like.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Build a `Validation` from anything string-like.
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
