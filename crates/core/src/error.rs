//! Domain error taxonomy.
//!
//! Lock denial and presence "already exists" outcomes are NOT errors — they
//! are `success = false` action infos (see `locking` / `coedition`). Errors
//! are reserved for conditions the caller cannot act on at the UI level:
//! missing required arguments and programming mistakes such as an unmapped
//! query field.

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A required argument was missing or empty. Raised before any lock is
    /// taken or state is mutated.
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// A query filter referenced a logical field with no backend property
    /// mapping. Silently dropping the clause would broaden the result set,
    /// so this is loud.
    #[error("Unknown query field: {0}")]
    UnknownQueryField(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Validate that a required string argument is non-empty.
///
/// `name` is the argument name used in the error message.
pub fn require_non_empty(name: &str, value: &str) -> Result<(), CoreError> {
    if value.is_empty() {
        return Err(CoreError::Validation(format!("{name} must not be empty")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_non_empty_accepts_value() {
        assert!(require_non_empty("lock_id", "doc-1").is_ok());
    }

    #[test]
    fn test_require_non_empty_rejects_empty() {
        let err = require_non_empty("lock_id", "").unwrap_err();
        assert!(err.to_string().contains("lock_id"));
    }
}
