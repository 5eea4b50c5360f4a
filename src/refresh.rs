//! # Refresh Registry
//!
//! Tracks which reactive contexts read which query keys and re-runs them when
//! the data behind a key changes. It also owns the background tasks the query
//! client schedules, such as cache garbage collection.
//!
//! ## Cross-Platform Compatibility
//!
//! - `dioxus::spawn` for background tasks (works on both web and desktop)
//! - `wasmtimer` for web timing and `tokio` for desktop timing, via [`crate::platform::sleep`]

use dioxus::{
    core::{ReactiveContext, Task},
    prelude::*,
};
use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex},
    time::Duration,
};

use crate::keys::QueryKey;

type ReactiveContextSet = Arc<Mutex<HashSet<ReactiveContext>>>;
type ReactiveContextRegistry = Arc<Mutex<HashMap<QueryKey, ReactiveContextSet>>>;

/// Kind of background task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskType {
    /// Removes unused entries and enforces the cache size limit
    CacheCleanup,
}

type PeriodicTaskRegistry = Arc<Mutex<HashMap<(String, TaskType), (Duration, Task)>>>;

/// Registry for refresh signals that re-run query hooks
#[derive(Clone, Default)]
pub struct RefreshRegistry {
    /// Counters for tracking how many times each key has been refreshed
    refresh_counters: Arc<Mutex<HashMap<QueryKey, u64>>>,
    /// Reactive contexts subscribed to each key
    reactive_contexts: ReactiveContextRegistry,
    periodic_tasks: PeriodicTaskRegistry,
}

impl RefreshRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of refreshes triggered for `key`, 0 if never
    pub fn get_refresh_count(&self, key: &QueryKey) -> u64 {
        if let Ok(counters) = self.refresh_counters.lock() {
            *counters.get(key).unwrap_or(&0)
        } else {
            0
        }
    }

    /// Mark `reactive_context` dirty whenever `key` is refreshed
    pub fn subscribe_to_refresh(&self, key: &QueryKey, reactive_context: ReactiveContext) {
        if let Ok(mut contexts) = self.reactive_contexts.lock() {
            let key_contexts = contexts
                .entry(key.clone())
                .or_insert_with(|| Arc::new(Mutex::new(HashSet::new())));
            if let Ok(mut context_set) = key_contexts.lock() {
                context_set.insert(reactive_context);
            }
        }
    }

    /// Trigger a refresh for a key
    ///
    /// This increments the refresh counter and marks all subscribed reactive contexts
    /// as dirty, causing components to re-render and queries to re-run.
    pub fn trigger_refresh(&self, key: &QueryKey) {
        if let Ok(mut counters) = self.refresh_counters.lock() {
            *counters.entry(key.clone()).or_insert(0) += 1;
        }

        // Collect first so no lock is held while contexts re-run
        let subscribers: Vec<ReactiveContext> = match self.reactive_contexts.lock() {
            Ok(contexts) => contexts
                .get(key)
                .and_then(|set| set.lock().ok().map(|set| set.iter().copied().collect()))
                .unwrap_or_default(),
            Err(_) => Vec::new(),
        };
        for reactive_context in subscribers {
            reactive_context.mark_dirty();
        }
    }

    /// Trigger a refresh for every subscribed key under `prefix`.
    ///
    /// Returns the keys that were refreshed.
    pub fn trigger_refresh_matching(&self, prefix: &QueryKey) -> Vec<QueryKey> {
        let keys: Vec<QueryKey> = match self.reactive_contexts.lock() {
            Ok(contexts) => contexts
                .keys()
                .filter(|key| key.starts_with(prefix))
                .cloned()
                .collect(),
            Err(_) => Vec::new(),
        };
        for key in &keys {
            self.trigger_refresh(key);
        }
        keys
    }

    /// Refresh every key that has ever been subscribed or refreshed
    pub fn clear_all(&self) {
        let mut keys: HashSet<QueryKey> = HashSet::new();
        if let Ok(counters) = self.refresh_counters.lock() {
            keys.extend(counters.keys().cloned());
        }
        if let Ok(contexts) = self.reactive_contexts.lock() {
            keys.extend(contexts.keys().cloned());
        }
        for key in keys {
            self.trigger_refresh(&key);
        }
    }

    /// Start a task calling `task_fn` every `interval`.
    ///
    /// A task already running under the same name and type is kept unless the
    /// new interval is shorter, in which case it is replaced.
    pub fn start_periodic_task<F>(&self, name: &str, task_type: TaskType, interval: Duration, task_fn: F)
    where
        F: Fn() + 'static,
    {
        let Ok(mut tasks) = self.periodic_tasks.lock() else {
            return;
        };
        let task_key = (name.to_string(), task_type);

        if let Some((current_interval, task)) = tasks.get(&task_key) {
            if interval >= *current_interval {
                return;
            }
            task.cancel();
        }

        let task = spawn(async move {
            loop {
                crate::platform::sleep(interval).await;
                task_fn();
            }
        });
        crate::debug_log!(
            "⏱️ [PERIODIC-TASK] Started {:?} task '{}' every {:?}",
            task_type,
            name,
            interval
        );
        tasks.insert(task_key, (interval, task));
    }

    /// Stop a periodic task
    pub fn stop_periodic_task(&self, name: &str, task_type: TaskType) {
        if let Ok(mut tasks) = self.periodic_tasks.lock()
            && let Some((_, task)) = tasks.remove(&(name.to_string(), task_type))
        {
            task.cancel();
        }
    }

    /// Drop subscriptions for keys whose last subscriber went away
    pub fn unsubscribe(&self, key: &QueryKey, reactive_context: &ReactiveContext) {
        if let Ok(mut contexts) = self.reactive_contexts.lock() {
            let now_empty = contexts
                .get(key)
                .and_then(|set| {
                    set.lock().ok().map(|mut set| {
                        set.remove(reactive_context);
                        set.is_empty()
                    })
                })
                .unwrap_or(false);
            if now_empty {
                contexts.remove(key);
            }
        }
    }

    pub fn stats(&self) -> RefreshRegistryStats {
        RefreshRegistryStats {
            refresh_count: self.refresh_counters.lock().map(|c| c.len()).unwrap_or(0),
            context_count: self.reactive_contexts.lock().map(|c| c.len()).unwrap_or(0),
            task_count: self.periodic_tasks.lock().map(|t| t.len()).unwrap_or(0),
        }
    }
}

/// Statistics for the refresh registry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshRegistryStats {
    pub refresh_count: usize,
    pub context_count: usize,
    pub task_count: usize,
}
