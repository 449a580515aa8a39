//! In-memory expiring store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

use super::ExpiringStore;
use crate::error::StoreError;

/// Stored size at which `add` first sweeps expired entries inline.
const MIN_PURGE_WATERMARK: usize = 1024;

/// A stored value with its expiration.
#[derive(Debug, Clone)]
struct Entry<V> {
    value: V,
    /// Lifetime granted on insertion and on every postponement.
    ttl: Duration,
    /// `None` when `now + ttl` is past the clock's range: never expires.
    expires_at: Option<Instant>,
}

impl<V> Entry<V> {
    fn new(value: V, ttl: Duration) -> Self {
        Self {
            value,
            ttl,
            expires_at: Instant::now().checked_add(ttl),
        }
    }

    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }

    fn postpone(&mut self) {
        self.expires_at = Instant::now().checked_add(self.ttl);
    }
}

/// Thread-safe in-memory store with time-based expiration.
///
/// Expired entries are invisible to every operation. They are physically
/// removed by [`MemoryStore::purge_expired`], by the background sweeper, when
/// `add` reuses their key, or by `add` itself once the stored size reaches
/// twice the live size seen at the previous inline sweep.
///
/// A TTL too large for the monotonic clock (such as [`Duration::MAX`]) means
/// the entry never expires.
#[derive(Debug)]
pub struct MemoryStore<V> {
    entries: RwLock<HashMap<String, Entry<V>>>,
    ttl: Duration,
    reset_on_access: bool,
    purge_watermark: AtomicUsize,
}

impl<V> MemoryStore<V> {
    /// Create a store whose entries live for `ttl` after insertion.
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
            reset_on_access: false,
            purge_watermark: AtomicUsize::new(MIN_PURGE_WATERMARK),
        }
    }

    /// Postpone an entry's expiry on every successful `get` or `set`.
    pub fn with_reset_on_access(mut self, enabled: bool) -> Self {
        self.reset_on_access = enabled;
        self
    }

    /// The default time-to-live for new entries.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Whether access postpones expiry.
    pub fn resets_on_access(&self) -> bool {
        self.reset_on_access
    }

    /// Insert a new entry with its own time-to-live.
    pub fn add_with_ttl(&self, key: &str, value: V, ttl: Duration) -> Result<(), StoreError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| StoreError::LockPoisoned)?;

        let now = Instant::now();
        if entries.get(key).is_some_and(|e| !e.is_expired(now)) {
            return Err(StoreError::KeyExists(key.into()));
        }

        // Only mutated under the write lock.
        if entries.len() >= self.purge_watermark.load(Ordering::Relaxed) {
            let before = entries.len();
            entries.retain(|_, entry| !entry.is_expired(now));
            let watermark = MIN_PURGE_WATERMARK.max(entries.len().saturating_mul(2));
            self.purge_watermark.store(watermark, Ordering::Relaxed);
            debug!(
                purged = before - entries.len(),
                watermark = watermark,
                "Swept expired entries on add"
            );
        }

        entries.insert(key.to_string(), Entry::new(value, ttl));
        trace!(cache_size = entries.len(), "Entry added");
        Ok(())
    }

    /// Remove all expired entries.
    ///
    /// Returns the number of entries removed.
    pub fn purge_expired(&self) -> Result<usize, StoreError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| StoreError::LockPoisoned)?;

        let now = Instant::now();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));
        Ok(before - entries.len())
    }

    /// Remove every entry, live or not.
    pub fn clear(&self) -> Result<(), StoreError> {
        self.entries
            .write()
            .map_err(|_| StoreError::LockPoisoned)?
            .clear();
        Ok(())
    }

    /// Number of physically stored entries, including expired ones not yet
    /// purged.
    pub fn stored_len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }
}

impl<V: Send + Sync + 'static> MemoryStore<V> {
    /// Periodically purge expired entries on the current tokio runtime.
    ///
    /// The task holds only a weak reference and stops on the first tick after
    /// the store is dropped.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a tokio runtime, or if `period` is zero.
    pub fn spawn_sweeper(store: &Arc<Self>, period: Duration) -> JoinHandle<()> {
        assert!(!period.is_zero(), "sweeper period must be non-zero");
        let store = Arc::downgrade(store);

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // The first tick completes immediately.
            ticker.tick().await;

            loop {
                ticker.tick().await;

                let Some(store) = store.upgrade() else {
                    debug!("Memory store dropped, stopping sweeper");
                    break;
                };

                match store.purge_expired() {
                    Ok(0) => {}
                    Ok(count) => debug!(count = count, "Purged expired entries"),
                    Err(e) => warn!(error = %e, "Sweeper failed to purge expired entries"),
                }
            }
        })
    }
}

impl<V: Clone + Send + Sync> ExpiringStore<V> for MemoryStore<V> {
    fn add(&self, key: &str, value: V) -> Result<(), StoreError> {
        self.add_with_ttl(key, value, self.ttl)
    }

    fn get(&self, key: &str) -> Result<V, StoreError> {
        let now = Instant::now();

        if self.reset_on_access {
            let mut entries = self
                .entries
                .write()
                .map_err(|_| StoreError::LockPoisoned)?;
            return match entries.get_mut(key) {
                Some(entry) if !entry.is_expired(now) => {
                    entry.postpone();
                    Ok(entry.value.clone())
                }
                _ => Err(StoreError::KeyNotFound(key.into())),
            };
        }

        let entries = self
            .entries
            .read()
            .map_err(|_| StoreError::LockPoisoned)?;
        match entries.get(key) {
            Some(entry) if !entry.is_expired(now) => Ok(entry.value.clone()),
            _ => Err(StoreError::KeyNotFound(key.into())),
        }
    }

    fn set(&self, key: &str, value: V) -> Result<(), StoreError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| StoreError::LockPoisoned)?;

        match entries.get_mut(key) {
            Some(entry) if !entry.is_expired(Instant::now()) => {
                entry.value = value;
                if self.reset_on_access {
                    entry.postpone();
                }
                Ok(())
            }
            _ => Err(StoreError::KeyNotFound(key.into())),
        }
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| StoreError::LockPoisoned)?;

        match entries.remove(key) {
            Some(entry) if !entry.is_expired(Instant::now()) => Ok(()),
            _ => Err(StoreError::KeyNotFound(key.into())),
        }
    }

    fn count(&self) -> Result<usize, StoreError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| StoreError::LockPoisoned)?;

        let now = Instant::now();
        Ok(entries.values().filter(|e| !e.is_expired(now)).count())
    }
}
