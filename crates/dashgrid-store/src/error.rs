#![forbid(unsafe_code)]

//! Errors crossing the persistence and data boundaries.
//!
//! Failures here surface as a transient user notification; the in-memory
//! dashboard state stays untouched and nothing retries automatically.

use thiserror::Error;

/// Boundary failure taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("dashboard {id} not found in realm {realm}")]
    NotFound { realm: String, id: String },

    #[error("dashboard {id} already exists in realm {realm}")]
    AlreadyExists { realm: String, id: String },

    #[error("access denied: {reason}")]
    AccessDenied { reason: String },

    #[error("backend failure: {message}")]
    Backend { message: String },
}

impl StoreError {
    /// Wrap an arbitrary backend failure message.
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        let err = StoreError::NotFound {
            realm: "master".into(),
            id: "d1".into(),
        };
        assert_eq!(err.to_string(), "dashboard d1 not found in realm master");

        assert_eq!(
            StoreError::backend("connection refused").to_string(),
            "backend failure: connection refused"
        );
    }
}
