//! Session-domain facade over an expiring store.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, error, trace};

use super::builder::SessionStoreBuilder;
use super::token::{log_prefix, Token};
use crate::crypt::Salter;
use crate::error::{SessionError, StoreError};
use crate::store::ExpiringStore;
use crate::Result;

/// Issues session tokens and maps each one to an application value.
///
/// The backing [`ExpiringStore`] is the only source of truth for which
/// tokens are live; nothing is cached here. Every accessor translates a
/// missing or expired key into [`SessionError::InvalidToken`], so callers
/// cannot tell a never-issued token from an expired one.
///
/// Cloning is cheap and shares the salter and the store.
pub struct SessionStore<V> {
    salter: Arc<Salter>,
    store: Arc<dyn ExpiringStore<V>>,
}

impl<V> SessionStore<V> {
    /// Start configuring a new session store.
    pub fn builder() -> SessionStoreBuilder<V> {
        SessionStoreBuilder::new()
    }

    pub(crate) fn from_parts(salter: Salter, store: Arc<dyn ExpiringStore<V>>) -> Self {
        Self {
            salter: Arc::new(salter),
            store,
        }
    }

    /// Create a new session holding `value` and return its token.
    ///
    /// With the secure salter policy this takes from a few microseconds up to
    /// a few milliseconds, dominated by entropy collection.
    ///
    /// # Errors
    ///
    /// - [`SessionError::TokenCollision`] when the store already holds the
    ///   generated token. This means the randomness sources are broken; the
    ///   error is fatal and must not be retried.
    /// - [`SessionError::Entropy`] when a randomness source failed (fatal).
    /// - Any other store error, unchanged.
    pub fn add(&self, value: V) -> Result<Token> {
        let token = self.salter.default_token().map_err(|e| {
            error!(error = %e, "Randomness sources failed, no session token issued");
            SessionError::Entropy(e)
        })?;

        match self.store.add(&token, value) {
            Ok(()) => {
                trace!(token = token.log_prefix(), "Session token issued");
                Ok(token)
            }
            Err(StoreError::KeyExists(_)) => {
                error!(
                    token = token.log_prefix(),
                    "Duplicated session token generated, randomness sources are compromised"
                );
                Err(SessionError::TokenCollision(token.into_string()))
            }
            Err(e) => Err(translate(&token, e)),
        }
    }

    /// Get the value stored for `token`.
    ///
    /// # Errors
    ///
    /// [`SessionError::InvalidToken`] when the token is unknown or expired.
    pub fn get(&self, token: &str) -> Result<V> {
        self.store.get(token).map_err(|e| translate(token, e))
    }

    /// Replace the value stored for `token`.
    ///
    /// # Errors
    ///
    /// [`SessionError::InvalidToken`] when the token is unknown or expired.
    pub fn set(&self, token: &str, value: V) -> Result<()> {
        self.store.set(token, value).map_err(|e| translate(token, e))
    }

    /// Remove the session identified by `token`.
    ///
    /// # Errors
    ///
    /// [`SessionError::InvalidToken`] when the token is unknown or expired,
    /// including a second delete of the same token.
    pub fn delete(&self, token: &str) -> Result<()> {
        self.store.delete(token).map_err(|e| translate(token, e))?;
        trace!(token = log_prefix(token), "Session removed");
        Ok(())
    }

    /// Number of live sessions.
    ///
    /// # Errors
    ///
    /// [`SessionError::NotSupported`] when the store cannot count.
    pub fn count(&self) -> Result<usize> {
        self.store.count().map_err(|e| match e {
            StoreError::NotSupported(op) => SessionError::NotSupported(op),
            other => SessionError::Store(other),
        })
    }

    /// The salter used for new tokens.
    pub fn salter(&self) -> &Salter {
        &self.salter
    }
}

/// Translate a store error into the session domain.
fn translate(token: &str, err: StoreError) -> SessionError {
    match err {
        StoreError::KeyNotFound(_) => {
            debug!(token = log_prefix(token), "Invalid session token");
            SessionError::InvalidToken(token.to_string())
        }
        StoreError::NotSupported(op) => SessionError::NotSupported(op),
        other => SessionError::Store(other),
    }
}

impl<V> Clone for SessionStore<V> {
    fn clone(&self) -> Self {
        Self {
            salter: Arc::clone(&self.salter),
            store: Arc::clone(&self.store),
        }
    }
}

impl<V> fmt::Debug for SessionStore<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field("salter", &self.salter)
            .finish_non_exhaustive()
    }
}
