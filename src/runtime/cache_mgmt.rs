//! Cache management owned by the query client.

use std::time::Duration;

use crate::{
    platform::MIN_CLEANUP_INTERVAL,
    refresh::TaskType,
    runtime::QueryClient,
};

const MAINTENANCE_TASK: &str = "query-cache";

/// Start periodic garbage collection for the client's cache.
///
/// Every `max(gc_time / 4, 30s)` the task:
/// 1. removes entries nobody has read for `gc_time`
/// 2. evicts least recently used entries beyond `max_entries`
///
/// Calling this again with the same configuration keeps the running task.
pub fn setup_cache_maintenance(client: &QueryClient) {
    let gc_time = client.config().gc_time();
    let max_entries = client.config().max_entries();
    let cleanup_interval = cleanup_interval(gc_time);
    let cache = client.cache().clone();

    client.refresh_registry().start_periodic_task(
        MAINTENANCE_TASK,
        TaskType::CacheCleanup,
        cleanup_interval,
        move || {
            let stats = cache.maintain(gc_time, max_entries);
            if stats.unused_removed > 0 || stats.lru_evicted > 0 {
                crate::debug_log!(
                    "🧹 [SMART-CLEANUP] Removed {} unused and evicted {} entries, {} left",
                    stats.unused_removed,
                    stats.lru_evicted,
                    stats.final_size
                );
            }
        },
    );

    crate::debug_log!(
        "📊 [SMART-CACHE] Cache maintenance enabled (cleanup every {:?})",
        cleanup_interval
    );
}

/// Stop the garbage collection task
pub fn stop_cache_maintenance(client: &QueryClient) {
    client
        .refresh_registry()
        .stop_periodic_task(MAINTENANCE_TASK, TaskType::CacheCleanup);
}

pub(crate) fn cleanup_interval(gc_time: Duration) -> Duration {
    std::cmp::max(gc_time / 4, MIN_CLEANUP_INTERVAL)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cleanup_interval_has_a_floor() {
        assert_eq!(cleanup_interval(Duration::from_secs(300)), Duration::from_secs(75));
        assert_eq!(cleanup_interval(Duration::from_secs(60)), Duration::from_secs(30));
    }
}
