use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use http::Method;
use parking_lot::Mutex;

/// Statistics for the dynamic-resolution cache.
#[derive(Debug, Clone, Copy)]
pub struct CacheStats {
    /// Number of cache hits (memoized dynamic resolutions served).
    pub hits: u64,
    /// Number of cache misses (lookups that fell through to the pattern
    /// lists).
    pub misses: u64,
    /// Number of entries evicted at capacity, oldest first.
    pub evictions: u64,
    /// Current number of entries.
    pub size: usize,
    /// Maximum capacity.
    pub capacity: usize,
}

impl CacheStats {
    /// Cache hit rate as a percentage.
    #[must_use]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

type CacheKey = (Method, String);

#[derive(Default)]
struct CacheInner {
    map: HashMap<CacheKey, Arc<str>>,
    order: VecDeque<CacheKey>,
    hits: u64,
    misses: u64,
    evictions: u64,
}

/// Bounded memo of dynamic `(method, path) → RAI` resolutions.
///
/// Insertion-ordered with FIFO eviction: once the bound is reached the
/// least-recently-inserted entry is dropped first. A hit does not refresh
/// an entry's position. The whole read-check-insert-evict sequence runs
/// under one mutex so the eviction contract holds under concurrent
/// workers.
pub(crate) struct ResolutionCache {
    capacity: usize,
    inner: Mutex<CacheInner>,
}

impl ResolutionCache {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            inner: Mutex::new(CacheInner::default()),
        }
    }

    pub(crate) fn get(&self, method: &Method, path: &str) -> Option<Arc<str>> {
        let mut inner = self.inner.lock();
        let key = (method.clone(), path.to_string());
        let hit = inner.map.get(&key).map(Arc::clone);
        match hit {
            Some(rai) => {
                inner.hits += 1;
                Some(rai)
            }
            None => {
                inner.misses += 1;
                None
            }
        }
    }

    pub(crate) fn insert(&self, method: Method, path: String, rai: Arc<str>) {
        if self.capacity == 0 {
            return;
        }
        let mut inner = self.inner.lock();
        let key = (method, path);
        // Two workers can miss on the same key concurrently; the second
        // insert must not enqueue the key twice.
        if inner.map.insert(key.clone(), rai).is_some() {
            return;
        }
        inner.order.push_back(key);
        while inner.map.len() > self.capacity {
            match inner.order.pop_front() {
                Some(oldest) => {
                    inner.map.remove(&oldest);
                    inner.evictions += 1;
                }
                None => break,
            }
        }
    }

    pub(crate) fn stats(&self) -> CacheStats {
        let inner = self.inner.lock();
        CacheStats {
            hits: inner.hits,
            misses: inner.misses,
            evictions: inner.evictions,
            size: inner.map.len(),
            capacity: self.capacity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rai(s: &str) -> Arc<str> {
        Arc::from(s)
    }

    #[test]
    fn evicts_oldest_first_at_capacity() {
        let cache = ResolutionCache::with_capacity(2);
        cache.insert(Method::GET, "/a/1".into(), rai("a"));
        cache.insert(Method::GET, "/a/2".into(), rai("b"));
        cache.insert(Method::GET, "/a/3".into(), rai("c"));

        assert!(cache.get(&Method::GET, "/a/1").is_none());
        assert!(cache.get(&Method::GET, "/a/2").is_some());
        assert!(cache.get(&Method::GET, "/a/3").is_some());

        let stats = cache.stats();
        assert_eq!(stats.size, 2);
        assert_eq!(stats.evictions, 1);
    }

    #[test]
    fn hit_does_not_refresh_insertion_order() {
        let cache = ResolutionCache::with_capacity(2);
        cache.insert(Method::GET, "/a/1".into(), rai("a"));
        cache.insert(Method::GET, "/a/2".into(), rai("b"));
        // touch the oldest entry, then overflow: FIFO still evicts it
        assert!(cache.get(&Method::GET, "/a/1").is_some());
        cache.insert(Method::GET, "/a/3".into(), rai("c"));
        assert!(cache.get(&Method::GET, "/a/1").is_none());
    }

    #[test]
    fn duplicate_insert_keeps_single_queue_slot() {
        let cache = ResolutionCache::with_capacity(2);
        cache.insert(Method::GET, "/a/1".into(), rai("a"));
        cache.insert(Method::GET, "/a/1".into(), rai("a"));
        cache.insert(Method::GET, "/a/2".into(), rai("b"));
        cache.insert(Method::GET, "/a/3".into(), rai("c"));

        let stats = cache.stats();
        assert_eq!(stats.size, 2);
        assert_eq!(stats.evictions, 1);
    }

    #[test]
    fn methods_are_distinct_keys() {
        let cache = ResolutionCache::with_capacity(4);
        cache.insert(Method::GET, "/a/1".into(), rai("read"));
        cache.insert(Method::PUT, "/a/1".into(), rai("update"));
        assert_eq!(
            cache.get(&Method::GET, "/a/1").as_deref(),
            Some("read")
        );
        assert_eq!(
            cache.get(&Method::PUT, "/a/1").as_deref(),
            Some("update")
        );
    }

    #[test]
    fn hit_rate_reflects_traffic() {
        let cache = ResolutionCache::with_capacity(4);
        cache.insert(Method::GET, "/a/1".into(), rai("a"));
        let _ = cache.get(&Method::GET, "/a/1");
        let _ = cache.get(&Method::GET, "/a/2");
        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert!((stats.hit_rate() - 50.0).abs() < f64::EPSILON);
    }
}
