//! # DomainError
//!
//! Centralized error handling for the board.
//! Maps domain-specific failures to actionable error types.

use std::fmt;
use thiserror::Error;

/// What kind of entity a lookup failed to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Thread,
    Reply,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Thread => f.write_str("thread"),
            EntityKind::Reply => f.write_str("reply"),
        }
    }
}

/// The primary error type for all domain and service operations.
///
/// A wrong delete password is deliberately absent: it is an ordinary
/// outcome, not a failure.
#[derive(Error, Debug)]
pub enum DomainError {
    /// Missing or empty required input. Detected before touching the store.
    #[error("validation error: {0}")]
    Validation(String),

    /// Referenced thread or reply does not exist.
    #[error("{kind} not found: {id}")]
    NotFound { kind: EntityKind, id: String },

    /// Infrastructure failure (e.g., store unreachable, write rejected)
    #[error("storage error: {0}")]
    Storage(String),
}

impl DomainError {
    pub fn thread_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            kind: EntityKind::Thread,
            id: id.into(),
        }
    }

    pub fn reply_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            kind: EntityKind::Reply,
            id: id.into(),
        }
    }
}

/// A specialized Result type for board logic.
pub type Result<T> = std::result::Result<T, DomainError>;
