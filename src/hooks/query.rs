//! Shared machinery behind every query hook.

use std::{cell::RefCell, rc::Rc, time::Duration};

use dioxus::{core::ReactiveContext, prelude::*};

use crate::{
    context::use_data_context,
    errors::{ConfigError, HttpError},
    keys::QueryKey,
    registry::ResolvedProvider,
    runtime::request::handle_cache_miss,
    state::QueryState,
    types::{ProviderFuture, QueryOutputBounds},
};

/// Per-query cache behavior
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct QueryOptions {
    /// Force the query on or off; each hook has its own default
    pub enabled: Option<bool>,
    /// Treat cached results older than this as missing
    pub cache_expiration: Option<Duration>,
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    pub fn cache_expiration(mut self, expiration: Duration) -> Self {
        self.cache_expiration = Some(expiration);
        self
    }
}

/// A query a hook can run against a resolved provider
pub(crate) trait QueryRequest: Clone + PartialEq + 'static {
    /// What the provider returns and the cache stores
    type Response: QueryOutputBounds;
    /// What the hook exposes
    type Output: Clone + PartialEq + 'static;

    fn key(&self, provider: &ResolvedProvider) -> QueryKey;

    fn options(&self) -> &QueryOptions;

    fn enabled(&self) -> bool {
        self.options().enabled.unwrap_or(true)
    }

    /// Reject requests the provider cannot serve, before anything runs
    fn validate(&self, _provider: &ResolvedProvider) -> Result<(), ConfigError> {
        Ok(())
    }

    fn fetch(&self, provider: &ResolvedProvider) -> ProviderFuture<Self::Response>;

    fn decode(response: Self::Response) -> Result<Self::Output, HttpError>;
}

/// Core query hook: resolve, key, read the cache or fetch, and keep the
/// returned signal in sync with the cache entry.
///
/// All inner hooks run unconditionally so a configuration error does not
/// change the hook order between renders.
pub(crate) fn use_query_core<Q: QueryRequest>(
    request: Q,
    data_provider_name: Option<String>,
) -> Result<Signal<QueryState<Q::Output>>, ConfigError> {
    let context = use_data_context();
    let enabled_at_mount = request.enabled();
    let mut state = use_signal(|| {
        if enabled_at_mount {
            QueryState::Loading {
                task: spawn(async {}),
            }
        } else {
            QueryState::Idle
        }
    });

    let resolved = context
        .resolve(data_provider_name.as_deref())
        .and_then(|provider| request.validate(&provider).map(|_| provider));
    let provider = resolved.clone().ok();

    // The key this hook's memo currently listens to
    let subscription: Rc<RefCell<Option<(QueryKey, ReactiveContext)>>> =
        use_hook(|| Rc::new(RefCell::new(None)));
    use_drop({
        let subscription = subscription.clone();
        let client = context.client().clone();
        move || {
            if let Some((key, reactive_context)) = subscription.borrow_mut().take() {
                client.refresh_registry().unsubscribe(&key, &reactive_context);
            }
        }
    });

    let _execution_memo = use_memo(use_reactive!(|(request, provider)| {
        let Some(provider) = provider else {
            return;
        };
        let client = context.client();
        let key = request.key(&provider);

        if let Some(reactive_context) = ReactiveContext::current() {
            let previous = subscription
                .borrow_mut()
                .replace((key.clone(), reactive_context));
            if let Some((previous_key, previous_context)) = previous
                && previous_key != key
            {
                client
                    .refresh_registry()
                    .unsubscribe(&previous_key, &previous_context);
            }
            client
                .refresh_registry()
                .subscribe_to_refresh(&key, reactive_context);
        }

        // Reading the counter ties this memo to refreshes of the key
        let _current_refresh_count = client.refresh_registry().get_refresh_count(&key);

        if !request.enabled() {
            if !state.peek().is_idle() {
                state.set(QueryState::Idle);
            }
            return;
        }

        if let Some(cached) =
            client.get_query_data::<Q::Response>(&key, request.options().cache_expiration)
        {
            let next = QueryState::from_result(cached.and_then(Q::decode));
            if *state.peek() != next {
                state.set(next);
            }
            return;
        }

        handle_cache_miss(
            client,
            key,
            || request.fetch(&provider),
            Q::decode,
            context.error_handler(),
            state,
        );
    }));

    resolved.map(|_| state)
}
