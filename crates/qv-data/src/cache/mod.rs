//! Freshness-window caching for fetch results

use std::time::{Duration, Instant};
use parking_lot::RwLock;

/// Single-entry cache whose value is served only while it is younger than
/// the freshness window
pub struct FreshnessCache<T: Clone> {
    entry: RwLock<Option<CacheEntry<T>>>,
    window: Duration,
}

struct CacheEntry<T> {
    value: T,
    stored_at: Instant,
}

impl<T: Clone> FreshnessCache<T> {
    /// Create an empty cache
    pub fn new(window: Duration) -> Self {
        Self {
            entry: RwLock::new(None),
            window,
        }
    }

    /// Get the value if it is still fresh at `now`
    pub fn get_fresh(&self, now: Instant) -> Option<T> {
        let entry = self.entry.read();
        entry
            .as_ref()
            .filter(|e| now.saturating_duration_since(e.stored_at) < self.window)
            .map(|e| e.value.clone())
    }

    /// Whether a fresh value is available at `now`
    pub fn is_fresh(&self, now: Instant) -> bool {
        self.get_fresh(now).is_some()
    }

    /// Store a value, replacing the previous one
    pub fn put(&self, value: T, now: Instant) {
        *self.entry.write() = Some(CacheEntry {
            value,
            stored_at: now,
        });
    }

    /// Clear the cache
    pub fn clear(&self) {
        *self.entry.write() = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_served_within_window() {
        let cache = FreshnessCache::new(Duration::from_secs(300));
        let t0 = Instant::now();
        cache.put(7, t0);

        assert_eq!(cache.get_fresh(t0), Some(7));
        assert_eq!(cache.get_fresh(t0 + Duration::from_secs(299)), Some(7));
        assert_eq!(cache.get_fresh(t0 + Duration::from_secs(300)), None);
    }

    #[test]
    fn test_empty_cache_is_stale() {
        let cache: FreshnessCache<u32> = FreshnessCache::new(Duration::from_secs(1));
        assert!(!cache.is_fresh(Instant::now()));
    }

    #[test]
    fn test_zero_window_is_never_fresh() {
        let cache = FreshnessCache::new(Duration::ZERO);
        let t0 = Instant::now();
        cache.put("x", t0);
        assert!(!cache.is_fresh(t0));
    }

    #[test]
    fn test_clear() {
        let cache = FreshnessCache::new(Duration::from_secs(60));
        let t0 = Instant::now();
        cache.put(1, t0);
        cache.clear();
        assert_eq!(cache.get_fresh(t0), None);
    }
}
