//! Error types for session-tokens.
//!
//! Errors are layered the same way the components are: the randomness
//! sources report [`RandomError`], expiring stores report [`StoreError`], and
//! the session store translates both into [`SessionError`].

use thiserror::Error;

/// Failure of a randomness source.
///
/// A working entropy source is assumed to always be available, so any of
/// these is fatal for token issuance.
#[derive(Error, Debug)]
pub enum RandomError {
    /// The source list has no sources configured.
    #[error("no randomness sources configured")]
    NoSources,

    /// A zero-length token entropy request.
    #[error("requested zero bytes of entropy")]
    EmptyRequest,

    /// A source failed to produce bytes.
    #[error("randomness source '{source_name}' failed: {message}")]
    Source {
        source_name: &'static str,
        message: String,
    },
}

/// Errors reported by an expiring store implementation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The key is absent or its entry has expired.
    #[error("key not found: {0}")]
    KeyNotFound(String),

    /// A live entry already exists for the key.
    #[error("key already exists: {0}")]
    KeyExists(String),

    /// The store does not implement the requested operation.
    #[error("operation not supported by store: {0}")]
    NotSupported(String),

    /// Internal lock was poisoned.
    #[error("internal lock poisoned")]
    LockPoisoned,

    /// Backend specific failure (I/O, network, ...).
    #[error("store backend error: {0}")]
    Backend(String),
}

/// Main error type for session operations.
#[derive(Error, Debug)]
pub enum SessionError {
    /// The token does not map to a live session. Never issued, deleted and
    /// expired tokens are indistinguishable.
    #[error("invalid token: {0}")]
    InvalidToken(String),

    /// The backing store does not implement the requested capability.
    #[error("not supported: {0}")]
    NotSupported(String),

    /// A freshly generated token was already present in the store.
    #[error("duplicated token generated: {0}")]
    TokenCollision(String),

    /// The randomness sources failed while generating a token.
    #[error("token generation failed: {0}")]
    Entropy(#[from] RandomError),

    /// Any other store error, passed through unchanged.
    #[error(transparent)]
    Store(StoreError),
}

impl SessionError {
    /// Whether the error signals a systemic failure of token generation.
    ///
    /// Hosts should log these and terminate instead of retrying.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::TokenCollision(_) | Self::Entropy(_))
    }

    /// Whether the error is the "invalid token" condition.
    pub fn is_invalid_token(&self) -> bool {
        matches!(self, Self::InvalidToken(_))
    }
}

/// Errors raised while assembling a session store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// No backing store was configured.
    #[error("no backing store configured")]
    MissingStore,

    /// The selected salter policy requires a non-empty salt.
    #[error("the {0} salter policy requires a non-empty salt")]
    EmptySalt(crate::crypt::SalterPolicy),
}

/// Convenience Result type for session operations.
pub type Result<T> = std::result::Result<T, SessionError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypt::SalterPolicy;

    #[test]
    fn test_invalid_token_display() {
        let err = SessionError::InvalidToken("abc".into());
        assert!(err.to_string().contains("abc"));
        assert!(err.to_string().contains("invalid token"));
        assert!(err.is_invalid_token());
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_fatal_variants() {
        assert!(SessionError::TokenCollision("t".into()).is_fatal());
        assert!(SessionError::Entropy(RandomError::NoSources).is_fatal());
        assert!(!SessionError::NotSupported("count".into()).is_fatal());
        assert!(!SessionError::Store(StoreError::LockPoisoned).is_fatal());
    }

    #[test]
    fn test_store_error_is_transparent() {
        let err = SessionError::Store(StoreError::Backend("connection reset".into()));
        assert_eq!(err.to_string(), "store backend error: connection reset");
    }

    #[test]
    fn test_random_error_conversion() {
        let err: SessionError = RandomError::Source {
            source_name: "os",
            message: "unavailable".into(),
        }
        .into();
        assert!(matches!(err, SessionError::Entropy(_)));
        assert!(err.to_string().contains("'os'"));
    }

    #[test]
    fn test_build_error_display() {
        let err = BuildError::EmptySalt(SalterPolicy::Secure);
        assert!(err.to_string().contains("secure"));
        assert!(BuildError::MissingStore.to_string().contains("store"));
    }
}
