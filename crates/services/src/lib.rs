//! # services
//!
//! The operations of the board, expressed against the `ThreadRepository` port.
//! Handlers in `api-adapters` are thin wrappers around these.

pub mod outcome;
pub mod reply_service;
pub mod thread_service;

pub use outcome::{DeleteOutcome, Reported};
pub use reply_service::ReplyService;
pub use thread_service::ThreadService;

use domains::{DomainError, Result};
use std::str::FromStr;

/// Rejects empty required input before anything reaches the store.
pub(crate) fn require(field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(DomainError::Validation(format!("{field} is required")));
    }
    Ok(())
}

/// Parses a client-supplied identifier. Anything unparseable cannot name an
/// existing entity, so callers fold `None` into their not-found path.
pub(crate) fn parse_id<T: FromStr>(raw: &str) -> Option<T> {
    raw.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use domains::ThreadId;

    #[test]
    fn test_require_rejects_empty() {
        let err = require("text", "").unwrap_err();
        assert!(matches!(err, DomainError::Validation(msg) if msg == "text is required"));
        assert!(require("text", "hi").is_ok());
    }

    #[test]
    fn test_parse_id() {
        let id = ThreadId::new();
        assert_eq!(parse_id::<ThreadId>(&id.to_string()), Some(id));
        assert_eq!(parse_id::<ThreadId>("123"), None);
        assert_eq!(parse_id::<ThreadId>(""), None);
    }
}
