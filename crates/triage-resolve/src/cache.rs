//! Resolved-tree cache using moka
//!
//! Trees are keyed by store generation and root name, so a tree built from
//! an old generation is never served once the store has moved on.

use crate::error::ResolveError;
use crate::tree::ResolvedTree;
use moka::sync::Cache;
use std::sync::Arc;

/// Statistics for cache monitoring
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Approximate number of cached trees
    pub entry_count: u64,
}

/// Cache key: one root within one store generation
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TreeKey {
    /// Store generation
    pub generation: u64,
    /// Root issue name
    pub root: String,
}

impl TreeKey {
    /// Create key
    #[inline]
    #[must_use]
    pub fn new(generation: u64, root: impl Into<String>) -> Self {
        Self {
            generation,
            root: root.into(),
        }
    }
}

/// Concurrent cache of resolved trees
///
/// Only fully built trees are inserted. Concurrent requests for the same
/// key wait on a single build instead of racing; unrelated keys build in
/// parallel.
#[derive(Debug, Clone)]
pub struct TreeCache {
    inner: Cache<TreeKey, Arc<ResolvedTree>>,
}

impl TreeCache {
    /// Create cache with max capacity
    #[inline]
    #[must_use]
    pub fn new(max_capacity: u64) -> Self {
        Self {
            inner: Cache::new(max_capacity),
        }
    }

    /// Get a cached tree
    #[inline]
    #[must_use]
    pub fn get(&self, key: &TreeKey) -> Option<Arc<ResolvedTree>> {
        self.inner.get(key)
    }

    /// Get or build a tree
    ///
    /// `build` runs at most once per key among concurrent callers. A failed
    /// build caches nothing and every waiting caller receives the error.
    ///
    /// # Errors
    /// Returns the error produced by `build`
    pub fn try_get_or_insert_with<F>(
        &self,
        key: TreeKey,
        build: F,
    ) -> Result<Arc<ResolvedTree>, ResolveError>
    where
        F: FnOnce() -> Result<ResolvedTree, ResolveError>,
    {
        self.inner
            .try_get_with(key, || build().map(Arc::new))
            .map_err(|e| (*e).clone())
    }

    /// Invalidate a single entry
    #[inline]
    pub fn invalidate(&self, key: &TreeKey) {
        self.inner.invalidate(key);
    }

    /// Invalidate all entries
    #[inline]
    pub fn invalidate_all(&self) {
        self.inner.invalidate_all();
    }

    /// Check if a tree is cached for key
    #[inline]
    #[must_use]
    pub fn contains(&self, key: &TreeKey) -> bool {
        self.inner.contains_key(key)
    }

    /// Get cache statistics
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        self.inner.run_pending_tasks();
        CacheStats {
            entry_count: self.inner.entry_count(),
        }
    }
}

impl Default for TreeCache {
    /// Create cache with default capacity
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_CACHE_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use triage_model::{Address, Links, PresentationNode, Priority};

    fn tree(name: &str) -> ResolvedTree {
        ResolvedTree {
            root_name: name.to_string(),
            generation: 1,
            root: PresentationNode {
                title: name.to_string(),
                description: String::new(),
                priority: Priority::default(),
                version: None,
                remedy: String::new(),
                links: Links::default(),
                source_record_id: name.to_string(),
                address: Address::root(name),
                children: Vec::new(),
                is_reference_expansion: false,
                reference_origin: None,
            },
            skipped_references: Vec::new(),
        }
    }

    #[test]
    fn builds_once_per_key() {
        let cache = TreeCache::new(16);
        let calls = AtomicUsize::new(0);
        let key = TreeKey::new(1, "A");

        let first = cache
            .try_get_or_insert_with(key.clone(), || {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(tree("A"))
            })
            .unwrap();
        let second = cache
            .try_get_or_insert_with(key.clone(), || unreachable!("should use cached value"))
            .unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(cache.contains(&key));
    }

    #[test]
    fn failed_build_is_not_cached() {
        let cache = TreeCache::new(16);
        let key = TreeKey::new(1, "A");

        let err = cache
            .try_get_or_insert_with(key.clone(), || Err(ResolveError::NotFound("A".into())))
            .unwrap_err();
        assert_eq!(err, ResolveError::NotFound("A".into()));
        assert!(!cache.contains(&key));
        assert!(cache.get(&key).is_none());
    }

    #[test]
    fn generations_do_not_collide() {
        let cache = TreeCache::new(16);
        cache
            .try_get_or_insert_with(TreeKey::new(1, "A"), || Ok(tree("A")))
            .unwrap();
        assert!(cache.get(&TreeKey::new(2, "A")).is_none());
    }

    #[test]
    fn invalidation() {
        let cache = TreeCache::default();
        let key = TreeKey::new(1, "A");
        cache.try_get_or_insert_with(key.clone(), || Ok(tree("A"))).unwrap();
        cache
            .try_get_or_insert_with(TreeKey::new(1, "B"), || Ok(tree("B")))
            .unwrap();
        assert_eq!(cache.stats().entry_count, 2);

        cache.invalidate(&key);
        assert!(!cache.contains(&key));

        cache.invalidate_all();
        assert!(cache.get(&TreeKey::new(1, "B")).is_none());
    }
}
