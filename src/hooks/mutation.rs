//! Plumbing shared by the mutation hooks.

use std::future::Future;

use dioxus::{core::Task, prelude::*};

use crate::{
    context::DataContext,
    errors::HttpError,
    keys::{QueryKey, QueryKeyBuilder},
    notification::{NotificationProp, OpenNotificationParams},
    state::MutationState,
};

/// `data/<provider>/mutation/<name>`
pub(crate) fn mutation_key(provider: &str, name: &str) -> QueryKey {
    QueryKeyBuilder::new().data(provider).mutation(name).get()
}

/// Notification props and fallbacks for one mutation call
pub(crate) struct OutcomeReport<'a, D, V> {
    pub key: &'a QueryKey,
    pub values: &'a V,
    pub resource: &'a str,
    pub success: &'a NotificationProp<D, V>,
    pub error: &'a NotificationProp<HttpError, V>,
    pub success_fallback: Option<OpenNotificationParams>,
}

impl<D, V> OutcomeReport<'_, D, V> {
    /// Route a settled mutation to the notification sink, and failures to the
    /// error handler as well.
    pub fn deliver(
        self,
        context: &DataContext,
        result: &Result<D, HttpError>,
        error_fallback: impl FnOnce(&HttpError) -> Option<OpenNotificationParams>,
    ) {
        match result {
            Ok(data) => {
                crate::log_mutation_success!("{} on {}", self.key, self.resource);
                context.notifications().dispatch(
                    self.success.request(data, self.values, self.resource),
                    self.success_fallback,
                );
            }
            Err(error) => {
                crate::log_mutation_error!("{} on {}: {}", self.key, self.resource, error);
                context.handle_error(error);
                context.notifications().dispatch(
                    self.error.request(error, self.values, self.resource),
                    error_fallback(error),
                );
            }
        }
    }
}

/// Track `future` in `state`: loading now, settled when it completes
pub(crate) fn track_mutation<T, F>(
    mut state: Signal<MutationState<T>>,
    future: F,
) -> impl Future<Output = Result<T, HttpError>> + 'static
where
    T: Clone + 'static,
    F: Future<Output = Result<T, HttpError>> + 'static,
{
    state.set(MutationState::Loading);
    async move {
        let result = future.await;
        state.set(MutationState::from_result(result.clone()));
        result
    }
}

/// Fire-and-forget variant of [`track_mutation`]
pub(crate) fn spawn_mutation<T, F>(state: Signal<MutationState<T>>, future: F) -> Task
where
    T: Clone + 'static,
    F: Future<Output = Result<T, HttpError>> + 'static,
{
    let tracked = track_mutation(state, future);
    spawn(async move {
        let _ = tracked.await;
    })
}
