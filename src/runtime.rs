//! Query client: the cache, refresh and de-duplication state every hook shares.
//!
//! One [`QueryClient`] lives in the data context. Hooks use it to read cached
//! results, to make sure only one provider call per key is in flight, and to
//! invalidate whole key scopes after a write.

pub mod cache_mgmt;
pub mod request;

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};

use crate::{
    cache::{CacheGetOptions, QueryCache},
    errors::HttpError,
    keys::QueryKey,
    platform::{DEFAULT_MAX_CACHE_SIZE, DEFAULT_UNUSED_THRESHOLD},
    refresh::RefreshRegistry,
    types::QueryOutputBounds,
};

/// Configuration for the query client.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryClientConfig {
    gc_time: Duration,
    max_entries: usize,
    cache_expiration: Option<Duration>,
}

impl QueryClientConfig {
    /// Create a new config with default settings.
    pub fn new() -> Self {
        Self {
            gc_time: DEFAULT_UNUSED_THRESHOLD,
            max_entries: DEFAULT_MAX_CACHE_SIZE,
            cache_expiration: None,
        }
    }

    /// How long an entry nobody reads survives
    pub fn with_gc_time(mut self, gc_time: Duration) -> Self {
        self.gc_time = gc_time;
        self
    }

    /// Cap on cached entries; least recently used ones are evicted first
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries;
        self
    }

    /// Expiration applied to queries that do not set their own
    pub fn with_cache_expiration(mut self, expiration: Duration) -> Self {
        self.cache_expiration = Some(expiration);
        self
    }

    pub fn gc_time(&self) -> Duration {
        self.gc_time
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    pub fn cache_expiration(&self) -> Option<Duration> {
        self.cache_expiration
    }
}

impl Default for QueryClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared query state. Cloning is cheap and clones share everything.
#[derive(Clone)]
pub struct QueryClient {
    config: QueryClientConfig,
    cache: QueryCache,
    refresh_registry: RefreshRegistry,
    pending_requests: Arc<Mutex<HashMap<QueryKey, u32>>>,
}

impl QueryClient {
    pub fn new(config: QueryClientConfig) -> Self {
        Self {
            config,
            cache: QueryCache::new(),
            refresh_registry: RefreshRegistry::new(),
            pending_requests: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn config(&self) -> &QueryClientConfig {
        &self.config
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    pub fn refresh_registry(&self) -> &RefreshRegistry {
        &self.refresh_registry
    }

    /// Read a cached query result stored by a hook
    pub fn get_query_data<R: QueryOutputBounds>(
        &self,
        key: &QueryKey,
        expiration: Option<Duration>,
    ) -> Option<Result<R, HttpError>> {
        let mut options = CacheGetOptions::new();
        if let Some(expiration) = expiration.or(self.config.cache_expiration) {
            options = options.with_expiration(expiration);
        }
        self.cache.get_with_options(key, &options)
    }

    /// Store a query result and wake its subscribers if it changed
    pub fn set_query_data<R: QueryOutputBounds>(
        &self,
        key: QueryKey,
        result: Result<R, HttpError>,
    ) -> bool {
        let updated = self.cache.set(key.clone(), result);
        if updated {
            self.refresh_registry.trigger_refresh(&key);
        }
        updated
    }

    /// Track whether a request for a key is already pending.
    ///
    /// Returns `true` for the first caller, who is responsible for the fetch.
    pub fn mark_request_pending(&self, key: &QueryKey) -> bool {
        if let Ok(mut pending) = self.pending_requests.lock() {
            let count = pending.entry(key.clone()).or_insert(0);
            *count += 1;
            *count == 1
        } else {
            false
        }
    }

    /// Complete a pending request.
    pub fn mark_request_complete(&self, key: &QueryKey) {
        if let Ok(mut pending) = self.pending_requests.lock()
            && pending.remove(key).is_some()
        {
            crate::debug_log!("✅ [REQUEST-DEDUP] Request completed for key: {}", key);
        }
    }

    pub fn is_request_pending(&self, key: &QueryKey) -> bool {
        self.pending_request_count(key) > 0
    }

    /// Number of hooks waiting on a given key.
    pub fn pending_request_count(&self, key: &QueryKey) -> u32 {
        if let Ok(pending) = self.pending_requests.lock() {
            *pending.get(key).unwrap_or(&0)
        } else {
            0
        }
    }

    /// Drop every cached result under `prefix` and re-run the hooks reading
    /// them. Returns the number of hooks' keys refreshed.
    pub fn invalidate(&self, prefix: &QueryKey) -> usize {
        self.cache.remove_matching(prefix);
        let refreshed = self.refresh_registry.trigger_refresh_matching(prefix);
        crate::log_cache_invalidate!("{} ({} active keys)", prefix, refreshed.len());
        refreshed.len()
    }

    /// Drop the whole cache and re-run every hook
    pub fn invalidate_all(&self) {
        self.cache.clear();
        self.refresh_registry.clear_all();
    }
}

impl Default for QueryClient {
    fn default() -> Self {
        Self::new(QueryClientConfig::default())
    }
}

impl PartialEq for QueryClient {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.pending_requests, &other.pending_requests)
    }
}
