// ── Generic query family ──
//
// Concurrent keyed storage for one query shape. A family never notifies
// on its own: `QueryCache` owns the revision counter and bumps it once
// per logical mutation, after every affected family has been touched.

use std::hash::Hash;
use std::sync::Arc;

use dashmap::DashMap;

/// Staleness state of a cached entry.
///
/// Stale data remains readable until replaced; the flag only signals
/// that the next access should trigger a refetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    Fresh,
    Stale,
}

/// A cached query result plus its staleness flag.
#[derive(Debug)]
pub struct CachedEntry<T> {
    pub value: Arc<T>,
    pub freshness: Freshness,
}

impl<T> CachedEntry<T> {
    pub fn is_fresh(&self) -> bool {
        self.freshness == Freshness::Fresh
    }
}

impl<T> Clone for CachedEntry<T> {
    fn clone(&self) -> Self {
        Self {
            value: Arc::clone(&self.value),
            freshness: self.freshness,
        }
    }
}

/// Keyed entries for one query shape.
pub(crate) struct QueryFamily<K, V>
where
    K: Eq + Hash + Clone,
{
    entries: DashMap<K, CachedEntry<V>>,
}

impl<K: Eq + Hash + Clone, V> QueryFamily<K, V> {
    pub(crate) fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Current entry for a key, value and staleness together. Never blocks.
    pub(crate) fn get(&self, key: &K) -> Option<CachedEntry<V>> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    /// Unconditional overwrite; the entry comes back fresh.
    pub(crate) fn set(&self, key: K, value: V) -> Arc<V> {
        let value = Arc::new(value);
        self.entries.insert(
            key,
            CachedEntry {
                value: Arc::clone(&value),
                freshness: Freshness::Fresh,
            },
        );
        value
    }

    /// Put back a previously captured entry, freshness included.
    /// Used to roll back an optimistic patch.
    pub(crate) fn restore(&self, key: K, entry: CachedEntry<V>) {
        self.entries.insert(key, entry);
    }

    /// Mark one entry stale. Returns `false` if the key is absent.
    pub(crate) fn invalidate(&self, key: &K) -> bool {
        match self.entries.get_mut(key) {
            Some(mut entry) => {
                entry.freshness = Freshness::Stale;
                true
            }
            None => false,
        }
    }

    /// Mark every entry in the family stale.
    pub(crate) fn invalidate_all(&self) {
        for mut entry in self.entries.iter_mut() {
            entry.freshness = Freshness::Stale;
        }
    }

    /// Apply a pure transformation to a cached value, without touching
    /// its freshness. Returns the pre-patch entry for rollback; patching
    /// an absent key is a no-op returning `None`.
    pub(crate) fn patch(&self, key: &K, update: impl FnOnce(&V) -> V) -> Option<CachedEntry<V>> {
        let mut entry = self.entries.get_mut(key)?;
        let prior = entry.clone();
        entry.value = Arc::new(update(&prior.value));
        Some(prior)
    }

    /// Drop an entry entirely (delete-confirmation path).
    pub(crate) fn remove(&self, key: &K) -> Option<CachedEntry<V>> {
        self.entries.remove(key).map(|(_, entry)| entry)
    }

    /// All current keys.
    pub(crate) fn keys(&self) -> Vec<K> {
        self.entries.iter().map(|e| e.key().clone()).collect()
    }

    #[allow(dead_code)]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
