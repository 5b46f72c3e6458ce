//! Bounded, thread-safe LRU cache with a cost budget
//!
//! Entries are bounded twice: by count (the LRU capacity) and by total cost,
//! where each value reports its own cost through [`CacheCost`]. Inserting past
//! either bound evicts least-recently-used entries. Eviction order is an
//! implementation detail; callers only rely on the cache never exceeding its
//! bounds and never returning a value for a key it was not stored under.

use std::borrow::Borrow;
use std::hash::Hash;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use lru::LruCache;
use parking_lot::Mutex;

/// Approximate memory cost of a cached value
pub trait CacheCost {
    fn cache_cost(&self) -> usize;
}

impl CacheCost for String {
    fn cache_cost(&self) -> usize {
        self.len()
    }
}

impl<T: CacheCost + ?Sized> CacheCost for Arc<T> {
    fn cache_cost(&self) -> usize {
        (**self).cache_cost()
    }
}

/// Point-in-time cache counters
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
    pub cost: usize,
}

struct Entry<V> {
    value: V,
    cost: usize,
}

struct Inner<K: Hash + Eq, V> {
    entries: LruCache<K, Entry<V>>,
    cost: usize,
}

pub struct BoundedCache<K: Hash + Eq, V> {
    inner: Mutex<Inner<K, V>>,
    max_cost: usize,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<K: Hash + Eq, V: Clone + CacheCost> BoundedCache<K, V> {
    /// Create a cache holding at most `capacity` entries whose combined cost
    /// stays within `max_cost`. A zero capacity is treated as one.
    pub fn new(capacity: usize, max_cost: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: Mutex::new(Inner {
                entries: LruCache::new(capacity),
                cost: 0,
            }),
            max_cost,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Look up a value, promoting it to most-recently-used
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let found = self.inner.lock().entries.get(key).map(|e| e.value.clone());
        match found {
            Some(_) => self.hits.fetch_add(1, Ordering::Relaxed),
            None => self.misses.fetch_add(1, Ordering::Relaxed),
        };
        found
    }

    /// Insert a value, evicting LRU entries until it fits.
    ///
    /// Returns `false` when the value alone exceeds the cost budget and was
    /// not admitted.
    pub fn insert(&self, key: K, value: V) -> bool {
        let cost = value.cache_cost().max(1);
        if cost > self.max_cost {
            tracing::trace!(cost, max_cost = self.max_cost, "cache entry rejected");
            return false;
        }

        let mut inner = self.inner.lock();
        if let Some(old) = inner.entries.pop(&key) {
            inner.cost -= old.cost;
        }
        while inner.cost + cost > self.max_cost {
            match inner.entries.pop_lru() {
                Some((_, evicted)) => inner.cost -= evicted.cost,
                None => break,
            }
        }
        if let Some((_, evicted)) = inner.entries.push(key, Entry { value, cost }) {
            inner.cost -= evicted.cost;
        }
        inner.cost += cost;
        true
    }

    pub fn remove<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let mut inner = self.inner.lock();
        match inner.entries.pop(key) {
            Some(entry) => {
                inner.cost -= entry.cost;
                true
            }
            None => false,
        }
    }

    /// Remove every entry whose key matches `pred`; returns how many were removed
    pub fn remove_matching(&self, mut pred: impl FnMut(&K) -> bool) -> usize
    where
        K: Clone,
    {
        let mut inner = self.inner.lock();
        let doomed: Vec<K> = inner
            .entries
            .iter()
            .filter(|(k, _)| pred(k))
            .map(|(k, _)| k.clone())
            .collect();
        for key in &doomed {
            if let Some(entry) = inner.entries.pop(key) {
                inner.cost -= entry.cost;
            }
        }
        doomed.len()
    }

    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.entries.clear();
        inner.cost = 0;
    }

    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.inner.lock().entries.cap().get()
    }

    pub fn max_cost(&self) -> usize {
        self.max_cost
    }

    /// Current combined cost of all entries
    pub fn cost(&self) -> usize {
        self.inner.lock().cost
    }

    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.lock();
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: inner.entries.len(),
            cost: inner.cost,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn cache(capacity: usize, max_cost: usize) -> BoundedCache<String, String> {
        BoundedCache::new(capacity, max_cost)
    }

    #[test]
    fn get_after_insert() {
        let c = cache(4, 1024);
        assert!(c.insert("a".into(), "#fff".into()));
        assert_eq!(c.get("a").as_deref(), Some("#fff"));
        assert_eq!(c.get("b"), None);

        let stats = c.stats();
        assert_eq!((stats.hits, stats.misses), (1, 1));
        assert_eq!(stats.cost, 4);
    }

    #[test]
    fn entry_count_is_bounded() {
        let c = cache(3, 1024);
        for i in 0..10 {
            c.insert(format!("k{i}"), "v".into());
        }
        assert_eq!(c.len(), 3);
        assert_eq!(c.cost(), 3);
    }

    #[test]
    fn cost_budget_is_bounded() {
        let c = cache(100, 10);
        for i in 0..10 {
            c.insert(format!("k{i}"), "1234".into());
        }
        assert!(c.cost() <= 10);
        assert_eq!(c.len(), 2);
    }

    #[test]
    fn oversized_values_are_rejected() {
        let c = cache(10, 3);
        assert!(!c.insert("big".into(), "too long".into()));
        assert!(c.is_empty());
    }

    #[test]
    fn replacing_a_key_keeps_cost_accurate() {
        let c = cache(10, 100);
        c.insert("a".into(), "12345".into());
        c.insert("a".into(), "12".into());
        assert_eq!(c.cost(), 2);
        assert_eq!(c.get("a").as_deref(), Some("12"));
    }

    #[test]
    fn remove_matching_drops_selected_keys() {
        let c = cache(10, 100);
        c.insert("global:a".into(), "x".into());
        c.insert("global:b".into(), "x".into());
        c.insert("tenant:a".into(), "x".into());

        let removed = c.remove_matching(|k| k.ends_with(":a"));
        assert_eq!(removed, 2);
        assert_eq!(c.len(), 1);
        assert_eq!(c.cost(), 1);
    }

    #[test]
    fn clear_resets_cost() {
        let c = cache(10, 100);
        c.insert("a".into(), "abc".into());
        c.clear();
        assert!(c.is_empty());
        assert_eq!(c.cost(), 0);
    }
}
