//! # Query Cache
//!
//! A type-erased store for query results addressed by [`QueryKey`]:
//! - **Expiration**: a reader can treat entries older than a TTL as absent.
//! - **Prefix invalidation**: every entry under a key scope can be dropped at once.
//! - **Garbage collection**: entries nobody has read for a while are removed and
//!   the least recently used entries are evicted past a size limit.
//!
//! Values are stored as `Arc<dyn Any>` and read back with the type they were
//! written with. Query hooks store the provider's raw response so subscribers
//! decoding into different record types share one entry.
//!
//! ## Example
//! ```rust
//! use dioxus_data_hooks::cache::QueryCache;
//! use dioxus_data_hooks::keys::QueryKeyBuilder;
//!
//! let cache = QueryCache::new();
//! let key = QueryKeyBuilder::new().data("default").resource("posts").get();
//! cache.set(key.clone(), 42_u32);
//! assert_eq!(cache.get::<u32>(&key), Some(42));
//! ```

use std::{
    any::Any,
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicU32, Ordering},
    },
    time::Duration,
};

use crate::{keys::QueryKey, platform::Instant};

/// Options for cache retrieval operations
#[derive(Debug, Clone, Default)]
pub struct CacheGetOptions {
    /// Entries older than this are removed and reported as missing
    pub expiration: Option<Duration>,
}

impl CacheGetOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the expiration duration
    pub fn with_expiration(mut self, expiration: Duration) -> Self {
        self.expiration = Some(expiration);
        self
    }
}

/// A type-erased cache entry with timestamp and access tracking
#[derive(Clone)]
pub struct CacheEntry {
    data: Arc<dyn Any + Send + Sync>,
    cached_at: Arc<Mutex<Instant>>,
    last_accessed: Arc<Mutex<Instant>>,
    access_count: Arc<AtomicU32>,
}

impl CacheEntry {
    pub fn new<T: Clone + Send + Sync + 'static>(data: T) -> Self {
        let now = Instant::now();
        Self {
            data: Arc::new(data),
            cached_at: Arc::new(Mutex::new(now)),
            last_accessed: Arc::new(Mutex::new(now)),
            access_count: Arc::new(AtomicU32::new(0)),
        }
    }

    /// Read the value as `T`, recording the access.
    ///
    /// Returns `None` when the entry holds a different type.
    pub fn get<T: Clone + Send + Sync + 'static>(&self) -> Option<T> {
        if let Ok(mut last_accessed) = self.last_accessed.lock() {
            *last_accessed = Instant::now();
        }
        self.access_count.fetch_add(1, Ordering::SeqCst);
        self.data.downcast_ref::<T>().cloned()
    }

    /// Refreshes the cached_at timestamp to the current time.
    pub fn refresh_timestamp(&self) {
        if let Ok(mut cached_at) = self.cached_at.lock() {
            *cached_at = Instant::now();
        }
    }

    pub fn is_expired(&self, expiration: Duration) -> bool {
        self.age() > expiration
    }

    pub fn access_count(&self) -> u32 {
        self.access_count.load(Ordering::SeqCst)
    }

    /// Checks if the cache entry hasn't been accessed for the given duration.
    pub fn is_unused_for(&self, duration: Duration) -> bool {
        self.time_since_last_access() > duration
    }

    pub fn time_since_last_access(&self) -> Duration {
        if let Ok(last_accessed) = self.last_accessed.lock() {
            last_accessed.elapsed()
        } else {
            Duration::ZERO
        }
    }

    /// Gets the age of this cache entry.
    pub fn age(&self) -> Duration {
        if let Ok(cached_at) = self.cached_at.lock() {
            cached_at.elapsed()
        } else {
            Duration::ZERO
        }
    }
}

/// Cache for query results keyed by [`QueryKey`]
#[derive(Clone, Default)]
pub struct QueryCache {
    entries: Arc<Mutex<HashMap<QueryKey, CacheEntry>>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Retrieves a cached result by key.
    pub fn get<T: Clone + Send + Sync + 'static>(&self, key: &QueryKey) -> Option<T> {
        self.entries.lock().ok()?.get(key)?.get::<T>()
    }

    /// Retrieves a cached result, honoring `options`.
    ///
    /// # Side Effects
    ///
    /// An expired entry is removed.
    pub fn get_with_options<T: Clone + Send + Sync + 'static>(
        &self,
        key: &QueryKey,
        options: &CacheGetOptions,
    ) -> Option<T> {
        let mut entries = self.entries.lock().ok()?;
        let entry = entries.get(key)?;

        if let Some(expiration) = options.expiration
            && entry.is_expired(expiration)
        {
            entries.remove(key);
            crate::debug_log!(
                "🗑️ [CACHE-EXPIRATION] Removing expired cache entry for key: {}",
                key
            );
            return None;
        }

        entry.get::<T>()
    }

    /// Store `value` under `key`.
    ///
    /// Returns whether the stored value changed. Writing an equal value only
    /// refreshes the entry's timestamp.
    pub fn set<T: Clone + Send + Sync + PartialEq + 'static>(&self, key: QueryKey, value: T) -> bool {
        let Ok(mut entries) = self.entries.lock() else {
            return false;
        };

        if let Some(existing_entry) = entries.get_mut(&key)
            && let Some(existing_value) = existing_entry.get::<T>()
            && existing_value == value
        {
            existing_entry.refresh_timestamp();
            crate::debug_log!(
                "⏸️ [CACHE-STORE] Value unchanged for key: {}, refreshing timestamp",
                key
            );
            return false;
        }

        crate::log_cache_store!("Stored data for key: {}", key);
        entries.insert(key, CacheEntry::new(value));
        true
    }

    pub fn contains(&self, key: &QueryKey) -> bool {
        self.entries
            .lock()
            .map(|entries| entries.contains_key(key))
            .unwrap_or(false)
    }

    /// Removes a cached result by key.
    pub fn remove(&self, key: &QueryKey) -> bool {
        if let Ok(mut entries) = self.entries.lock() {
            entries.remove(key).is_some()
        } else {
            false
        }
    }

    /// Remove every entry whose key starts with `prefix`, returning the removed keys
    pub fn remove_matching(&self, prefix: &QueryKey) -> Vec<QueryKey> {
        let Ok(mut entries) = self.entries.lock() else {
            return Vec::new();
        };
        let removed: Vec<QueryKey> = entries
            .keys()
            .filter(|key| key.starts_with(prefix))
            .cloned()
            .collect();
        for key in &removed {
            entries.remove(key);
        }
        if !removed.is_empty() {
            crate::log_cache_invalidate!("Removed {} entries under {}", removed.len(), prefix);
        }
        removed
    }

    /// Clears all cached results.
    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            #[cfg(feature = "tracing")]
            let count = entries.len();
            entries.clear();
            #[cfg(feature = "tracing")]
            crate::debug_log!("🗑️ [CACHE-CLEAR] Cleared {} cache entries", count);
        }
    }

    /// Gets the number of cached entries.
    pub fn size(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    /// Cleans up unused entries based on access time.
    ///
    /// # Returns
    ///
    /// The number of unused entries removed.
    pub fn cleanup_unused_entries(&self, unused_threshold: Duration) -> usize {
        let Ok(mut entries) = self.entries.lock() else {
            return 0;
        };
        let initial_size = entries.len();
        entries.retain(|_key, entry| {
            let should_keep = !entry.is_unused_for(unused_threshold);
            if !should_keep {
                crate::debug_log!("🧹 [CACHE-CLEANUP] Removing unused entry: {}", _key);
            }
            should_keep
        });
        let removed = initial_size - entries.len();
        if removed > 0 {
            crate::debug_log!("🧹 [CACHE-CLEANUP] Removed {} unused entries", removed);
        }
        removed
    }

    /// Evicts least recently used entries to maintain cache size limit.
    ///
    /// # Returns
    ///
    /// The number of entries evicted.
    pub fn evict_lru_entries(&self, max_size: usize) -> usize {
        let Ok(mut entries) = self.entries.lock() else {
            return 0;
        };
        if entries.len() <= max_size {
            return 0;
        }

        let mut drained: Vec<_> = entries.drain().collect();

        // Most recently used first
        drained.sort_by_key(|(_, entry)| entry.time_since_last_access());

        let evicted = drained.split_off(max_size).len();
        entries.extend(drained);

        crate::debug_log!(
            "🗑️ [LRU-EVICT] Evicted {} entries due to cache size limit",
            evicted
        );
        evicted
    }

    /// Run both garbage collection passes
    pub fn maintain(&self, unused_threshold: Duration, max_size: usize) -> CacheMaintenanceStats {
        CacheMaintenanceStats {
            unused_removed: self.cleanup_unused_entries(unused_threshold),
            lru_evicted: self.evict_lru_entries(max_size),
            final_size: self.size(),
        }
    }

    pub fn stats(&self) -> CacheStats {
        let Ok(entries) = self.entries.lock() else {
            return CacheStats::default();
        };
        let mut total_age = Duration::ZERO;
        let mut total_accesses = 0;

        for entry in entries.values() {
            total_age += entry.age();
            total_accesses += entry.access_count();
        }

        let entry_count = entries.len();
        let avg_age = if entry_count > 0 {
            total_age / entry_count as u32
        } else {
            Duration::ZERO
        };

        CacheStats {
            entry_count,
            total_accesses,
            avg_age,
        }
    }
}

/// Statistics for cache maintenance operations
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheMaintenanceStats {
    pub unused_removed: usize,
    pub lru_evicted: usize,
    pub final_size: usize,
}

/// General cache statistics
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    pub entry_count: usize,
    pub total_accesses: u32,
    pub avg_age: Duration,
}

impl CacheStats {
    pub fn avg_accesses_per_entry(&self) -> f64 {
        if self.entry_count > 0 {
            self.total_accesses as f64 / self.entry_count as f64
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::{QueryAction, QueryKeyBuilder};

    fn key(resource: &str, action: QueryAction) -> QueryKey {
        QueryKeyBuilder::new()
            .data("default")
            .resource(resource)
            .action(action)
            .get()
    }

    #[test]
    fn test_set_reports_changes() {
        let cache = QueryCache::new();
        let key = key("posts", QueryAction::List);
        assert!(cache.set(key.clone(), vec![1, 2]));
        assert!(!cache.set(key.clone(), vec![1, 2]));
        assert!(cache.set(key.clone(), vec![1, 2, 3]));
        assert_eq!(cache.get::<Vec<i32>>(&key), Some(vec![1, 2, 3]));
        assert_eq!(cache.get::<String>(&key), None);
    }

    #[test]
    fn test_expired_entries_are_dropped_on_read() {
        let cache = QueryCache::new();
        let key = key("posts", QueryAction::List);
        cache.set(key.clone(), 1_u8);
        std::thread::sleep(Duration::from_millis(5));

        let fresh = CacheGetOptions::new().with_expiration(Duration::from_secs(60));
        assert_eq!(cache.get_with_options::<u8>(&key, &fresh), Some(1));

        let expired = CacheGetOptions::new().with_expiration(Duration::from_millis(1));
        assert_eq!(cache.get_with_options::<u8>(&key, &expired), None);
        assert!(!cache.contains(&key));
    }

    #[test]
    fn test_remove_matching_scope() {
        let cache = QueryCache::new();
        cache.set(key("posts", QueryAction::List), 1);
        cache.set(key("posts", QueryAction::Many), 2);
        cache.set(key("users", QueryAction::List), 3);

        let scope = QueryKeyBuilder::new().data("default").resource("posts").get();
        let removed = cache.remove_matching(&scope);
        assert_eq!(removed.len(), 2);
        assert_eq!(cache.size(), 1);
        assert!(cache.contains(&key("users", QueryAction::List)));
    }

    #[test]
    fn test_lru_eviction_keeps_recent_entries() {
        let cache = QueryCache::new();
        let old = key("old", QueryAction::List);
        let recent = key("recent", QueryAction::List);
        cache.set(old.clone(), 1);
        cache.set(recent.clone(), 2);
        std::thread::sleep(Duration::from_millis(5));
        cache.get::<i32>(&recent);

        assert_eq!(cache.evict_lru_entries(1), 1);
        assert!(cache.contains(&recent));
        assert!(!cache.contains(&old));
    }

    #[test]
    fn test_cleanup_unused_entries() {
        let cache = QueryCache::new();
        cache.set(key("posts", QueryAction::List), 1);
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(cache.cleanup_unused_entries(Duration::from_secs(60)), 0);
        assert_eq!(cache.cleanup_unused_entries(Duration::from_millis(1)), 1);
        assert_eq!(cache.size(), 0);
    }
}
