//! Cross-platform defaults and timing helpers

use std::time::Duration;

#[cfg(not(target_family = "wasm"))]
pub use std::time::Instant;
#[cfg(target_family = "wasm")]
pub use web_time::Instant;

#[cfg(not(target_family = "wasm"))]
use tokio::time;
#[cfg(target_family = "wasm")]
use wasmtimer::tokio as time;

/// Default cap on cached query results
pub const DEFAULT_MAX_CACHE_SIZE: usize = 1000;

/// Default time an unread cache entry survives before garbage collection
pub const DEFAULT_UNUSED_THRESHOLD: Duration = Duration::from_secs(300);

/// Lower bound on how often garbage collection runs
pub const MIN_CLEANUP_INTERVAL: Duration = Duration::from_secs(30);

/// Sleep on whichever timer the target provides
pub async fn sleep(duration: Duration) {
    time::sleep(duration).await;
}
