//! Process-lifetime key/value cache.
//!
//! No eviction, no size bound, no persistence. The owner constructs it and
//! hands it to whichever component memoizes through it; there is no global
//! instance. Access goes through `&mut self`, so sharing across threads
//! requires the caller to wrap the owner in a lock.

use std::collections::HashMap;
use std::hash::Hash;

/// Hit/miss counters, useful when tuning or asserting memoization in tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[derive(Debug, Clone)]
pub struct MemoryCache<K, V> {
    entries: HashMap<K, V>,
    stats: CacheStats,
}

impl<K, V> Default for MemoryCache<K, V> {
    fn default() -> Self {
        Self { entries: HashMap::new(), stats: CacheStats::default() }
    }
}

impl<K: Eq + Hash, V: Clone> MemoryCache<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a clone of the stored value. Store `Arc`s to share one object.
    pub fn get(&mut self, key: &K) -> Option<V> {
        match self.entries.get(key) {
            Some(v) => {
                self.stats.hits += 1;
                Some(v.clone())
            }
            None => {
                self.stats.misses += 1;
                None
            }
        }
    }

    pub fn set(&mut self, key: K, value: V) {
        self.entries.insert(key, value);
    }

    pub fn remove(&mut self, key: &K) {
        self.entries.remove(key);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn get_set_remove_clear() {
        let mut cache: MemoryCache<String, u32> = MemoryCache::new();
        assert_eq!(cache.get(&"a".to_string()), None);
        cache.set("a".to_string(), 1);
        cache.set("b".to_string(), 2);
        assert_eq!(cache.get(&"a".to_string()), Some(1));
        cache.remove(&"a".to_string());
        assert_eq!(cache.get(&"a".to_string()), None);
        assert_eq!(cache.len(), 1);
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn removing_missing_key_is_a_noop() {
        let mut cache: MemoryCache<&str, u8> = MemoryCache::new();
        cache.remove(&"nope");
        assert!(cache.is_empty());
    }

    #[test]
    fn stats_count_hits_and_misses() {
        let mut cache: MemoryCache<u8, u8> = MemoryCache::new();
        cache.get(&1);
        cache.set(1, 10);
        cache.get(&1);
        cache.get(&1);
        let stats = cache.stats();
        assert_eq!(stats, CacheStats { hits: 2, misses: 1 });
        assert!((stats.hit_rate() - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn arc_values_are_shared_not_copied() {
        let mut cache: MemoryCache<u8, Arc<Vec<u32>>> = MemoryCache::new();
        let value = Arc::new(vec![1, 2, 3]);
        cache.set(0, Arc::clone(&value));
        let got = cache.get(&0).expect("cached");
        assert!(Arc::ptr_eq(&got, &value));
    }
}
