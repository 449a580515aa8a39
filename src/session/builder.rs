//! Fluent construction of a [`SessionStore`].

use std::sync::Arc;

use super::store::SessionStore;
use crate::crypt::{Salter, SalterPolicy};
use crate::error::BuildError;
use crate::store::ExpiringStore;

/// Configures the salter policy and backing store of a [`SessionStore`].
///
/// The builder is consumed by [`build`](Self::build); the resulting store
/// exposes no way to swap its salter or backing store.
///
/// Rules applied by `build`:
/// - a backing store is mandatory ([`BuildError::MissingStore`]);
/// - without an explicit salter selection the secure policy is used;
/// - the secure policy rejects an empty salt ([`BuildError::EmptySalt`]),
///   the fast policy accepts one.
///
/// ```rust
/// use std::sync::Arc;
/// use std::time::Duration;
/// use session_tokens::{MemoryStore, SessionStore};
///
/// let store = Arc::new(MemoryStore::<Option<u32>>::new(Duration::from_secs(60)));
/// let sessions = SessionStore::builder()
///     .salter_fast(b"static-salt".to_vec())
///     .store(store)
///     .build()
///     .unwrap();
///
/// let token = sessions.add(None).unwrap();
/// sessions.set(&token, Some(42)).unwrap();
/// assert_eq!(sessions.get(&token).unwrap(), Some(42));
/// ```
pub struct SessionStoreBuilder<V> {
    policy: SalterPolicy,
    salt: Vec<u8>,
    store: Option<Arc<dyn ExpiringStore<V>>>,
}

impl<V> SessionStoreBuilder<V> {
    /// Create a builder with the secure policy, no salt and no store.
    pub fn new() -> Self {
        Self {
            policy: SalterPolicy::default(),
            salt: Vec::new(),
            store: None,
        }
    }

    /// Select the salter policy and its static salt.
    pub fn salter(mut self, policy: SalterPolicy, salt: impl Into<Vec<u8>>) -> Self {
        self.policy = policy;
        self.salt = salt.into();
        self
    }

    /// Use the fast policy (system PRNG only).
    pub fn salter_fast(self, salt: impl Into<Vec<u8>>) -> Self {
        self.salter(SalterPolicy::Fast, salt)
    }

    /// Use the secure policy (several entropy sources, slower).
    pub fn salter_secure(self, salt: impl Into<Vec<u8>>) -> Self {
        self.salter(SalterPolicy::Secure, salt)
    }

    /// Set the backing store.
    ///
    /// Pass an `Arc` to keep a handle to the store outside the session
    /// store.
    pub fn store<S>(mut self, store: S) -> Self
    where
        S: ExpiringStore<V> + 'static,
    {
        self.store = Some(Arc::new(store));
        self
    }

    /// Set an already type-erased backing store.
    pub fn shared_store(mut self, store: Arc<dyn ExpiringStore<V>>) -> Self {
        self.store = Some(store);
        self
    }

    /// The currently selected salter policy.
    pub fn policy(&self) -> SalterPolicy {
        self.policy
    }

    /// Assemble the session store.
    pub fn build(self) -> Result<SessionStore<V>, BuildError> {
        let store = self.store.ok_or(BuildError::MissingStore)?;

        if self.salt.is_empty() && !self.policy.allows_empty_salt() {
            return Err(BuildError::EmptySalt(self.policy));
        }

        let salter = Salter::from_policy(self.policy, self.salt);
        Ok(SessionStore::from_parts(salter, store))
    }
}

impl<V> Default for SessionStoreBuilder<V> {
    fn default() -> Self {
        Self::new()
    }
}
