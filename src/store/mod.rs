//! Expiring key-value stores.
//!
//! The session layer only talks to the [`ExpiringStore`] trait, so any
//! backend offering add-if-absent, get, set, delete and (optionally) count
//! with time-based expiration can be plugged in. [`MemoryStore`] is the
//! in-process implementation.

pub mod memory;

use std::sync::Arc;

use crate::error::StoreError;

pub use memory::MemoryStore;

/// A key-value store whose entries expire.
///
/// Implementations must present an expired entry exactly like an absent
/// one, reporting [`StoreError::KeyNotFound`] from `get`, `set` and
/// `delete`. `add` must be an atomic add-if-absent: concurrent callers
/// adding the same key must see exactly one success.
pub trait ExpiringStore<V>: Send + Sync {
    /// Insert a new entry. Fails with [`StoreError::KeyExists`] if a live
    /// entry already uses `key`.
    fn add(&self, key: &str, value: V) -> Result<(), StoreError>;

    /// Read the value stored for `key`.
    fn get(&self, key: &str) -> Result<V, StoreError>;

    /// Replace the value of an existing entry.
    fn set(&self, key: &str, value: V) -> Result<(), StoreError>;

    /// Remove an existing entry.
    fn delete(&self, key: &str) -> Result<(), StoreError>;

    /// Number of live entries.
    ///
    /// Stores that cannot count report [`StoreError::NotSupported`].
    fn count(&self) -> Result<usize, StoreError> {
        Err(StoreError::NotSupported("count".into()))
    }
}

impl<V, S> ExpiringStore<V> for Arc<S>
where
    S: ExpiringStore<V> + ?Sized,
{
    fn add(&self, key: &str, value: V) -> Result<(), StoreError> {
        (**self).add(key, value)
    }

    fn get(&self, key: &str) -> Result<V, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: V) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        (**self).delete(key)
    }

    fn count(&self) -> Result<usize, StoreError> {
        (**self).count()
    }
}
