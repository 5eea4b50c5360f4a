//! Request orchestration for query hooks.

use dioxus::prelude::*;

use crate::{
    errors::{ErrorHandler, HttpError},
    keys::QueryKey,
    runtime::QueryClient,
    state::QueryState,
    types::{ProviderFuture, QueryOutputBounds},
};

/// Converts a cached provider response into what the hook exposes
pub type Decoder<R, O> = fn(R) -> Result<O, HttpError>;

/// Cache miss orchestration: pending-request dedupe, background revalidation
/// after an invalidation, and the primary fetch.
///
/// `fetch` is only called by the hook that wins the de-duplication, so a
/// provider sees exactly one call per key while a request is in flight.
/// Failures are cached like successes (there is no retry) and reported to
/// `on_error` once per provider call.
pub fn handle_cache_miss<R, O, F>(
    client: &QueryClient,
    key: QueryKey,
    fetch: F,
    decode: Decoder<R, O>,
    on_error: ErrorHandler,
    mut state: Signal<QueryState<O>>,
) where
    R: QueryOutputBounds,
    O: 'static,
    F: FnOnce() -> ProviderFuture<R>,
{
    let is_new_request = client.mark_request_pending(&key);

    if !is_new_request {
        crate::debug_log!(
            "🔄 [REQUEST-DEDUP] Request already pending for key: {} ({} hooks waiting)",
            key,
            client.pending_request_count(&key)
        );

        if !state.peek().is_loading() && state.peek().data().is_none() {
            state.set(QueryState::Loading {
                task: spawn(async {}),
            });
        }
        return;
    }

    crate::log_query_start!("Starting new request for key: {}", key);

    let is_invalidation_refresh = client.refresh_registry().get_refresh_count(&key) > 0;
    let future = fetch();
    let client = client.clone();

    if is_invalidation_refresh && state.peek().data().is_some() {
        crate::debug_log!(
            "🔄 [INVALIDATION] Cache miss after invalidation for: {}, keeping current data",
            key
        );

        spawn(async move {
            let result = future.await;
            if let Err(error) = &result {
                on_error(error);
            }
            // Subscribers re-read the cache when the refresh fires
            client.cache().set(key.clone(), result);
            client.mark_request_complete(&key);
            client.refresh_registry().trigger_refresh(&key);
        });
        return;
    }

    let task = spawn(async move {
        let result = future.await;
        if let Err(error) = &result {
            on_error(error);
        }
        let updated = client.cache().set(key.clone(), result.clone());
        crate::debug_log!(
            "📊 [CACHE-STORE] Stored response for: {} (updated: {})",
            key,
            updated
        );
        state.set(QueryState::from_result(result.and_then(decode)));
        client.mark_request_complete(&key);
        client.refresh_registry().trigger_refresh(&key);
    });
    state.set(QueryState::Loading { task });
}
