//! Kernel row cache
//!
//! Every SMO step updates the gradient with two full kernel rows, so rows
//! rather than single entries are the unit of caching. Rows are shared out as
//! `Arc<[f64]>` so two of them can be held at once while the cache stays
//! mutably borrowed.

use lru::LruCache;
use std::fmt;
use std::num::NonZeroUsize;
use std::sync::Arc;

/// LRU cache of kernel matrix rows keyed by row index
pub struct KernelCache {
    rows: LruCache<usize, Arc<[f64]>>,
    hits: u64,
    misses: u64,
}

impl KernelCache {
    /// Create a cache holding at most `capacity` rows (minimum 1)
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            rows: LruCache::new(capacity),
            hits: 0,
            misses: 0,
        }
    }

    /// Get row `i`, computing and caching it on a miss
    pub fn get_or_compute<F>(&mut self, i: usize, compute: F) -> Arc<[f64]>
    where
        F: FnOnce() -> Vec<f64>,
    {
        if let Some(row) = self.rows.get(&i) {
            self.hits += 1;
            return Arc::clone(row);
        }

        self.misses += 1;
        let row: Arc<[f64]> = compute().into();
        self.rows.put(i, Arc::clone(&row));
        row
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            capacity: self.rows.cap().get(),
            size: self.rows.len(),
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub capacity: usize,
    pub size: usize,
}

impl CacheStats {
    /// Fraction of row requests served from the cache
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} rows, {} hits, {} misses, hit rate {:.2}",
            self.size,
            self.capacity,
            self.hits,
            self.misses,
            self.hit_rate()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_computed_once() {
        let mut cache = KernelCache::new(4);
        let mut calls = 0;

        let first = cache.get_or_compute(0, || {
            calls += 1;
            vec![1.0, 2.0]
        });
        let second = cache.get_or_compute(0, || {
            calls += 1;
            vec![9.0, 9.0]
        });

        assert_eq!(calls, 1);
        assert_eq!(&*first, &[1.0, 2.0]);
        assert_eq!(&*second, &[1.0, 2.0]);

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.size, 1);
    }

    #[test]
    fn test_lru_eviction() {
        let mut cache = KernelCache::new(2);

        cache.get_or_compute(0, || vec![0.0]);
        cache.get_or_compute(1, || vec![1.0]);
        cache.get_or_compute(0, || vec![0.0]); // 0 becomes most recent
        cache.get_or_compute(2, || vec![2.0]); // evicts 1

        let mut recomputed = Vec::new();
        for i in [0, 2, 1] {
            cache.get_or_compute(i, || {
                recomputed.push(i);
                vec![i as f64]
            });
        }
        assert_eq!(recomputed, vec![1]);
        assert_eq!(cache.stats().size, 2);
    }

    #[test]
    fn test_zero_capacity_holds_one_row() {
        let mut cache = KernelCache::new(0);
        cache.get_or_compute(3, || vec![3.0]);
        cache.get_or_compute(3, || vec![9.0]);
        let stats = cache.stats();
        assert_eq!(stats.capacity, 1);
        assert_eq!(stats.hits, 1);
    }

    #[test]
    fn test_hit_rate_calculation() {
        let mut cache = KernelCache::new(10);
        assert_eq!(cache.stats().hit_rate(), 0.0);

        cache.get_or_compute(0, || vec![0.0]);
        cache.get_or_compute(1, || vec![1.0]);
        cache.get_or_compute(0, || vec![0.0]);
        cache.get_or_compute(1, || vec![1.0]);

        // 2 hits, 2 misses
        assert_eq!(cache.stats().hit_rate(), 0.5);
    }

    #[test]
    fn test_stats_display() {
        let mut cache = KernelCache::new(4);
        cache.get_or_compute(0, || vec![0.0]);
        cache.get_or_compute(0, || vec![0.0]);
        assert_eq!(
            cache.stats().to_string(),
            "1/4 rows, 1 hits, 1 misses, hit rate 0.50"
        );
    }
}
