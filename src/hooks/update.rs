//! `use_update`: update a record through the provider.

use std::future::Future;

use dioxus::prelude::*;
use serde::Serialize;

use crate::{
    context::{DataContext, use_data_context},
    crud::{BaseKey, UpdateParams, UpdateResponse},
    errors::{ConfigError, HttpError},
    hooks::{
        invalidate::{Invalidation, invalidate_scopes},
        mutation::{OutcomeReport, mutation_key, spawn_mutation, track_mutation},
    },
    notification::{NotificationProp, OpenNotificationParams},
    state::MutationState,
    types::{MetaQuery, RecordBounds},
};

/// Scopes invalidated after an update when the caller does not choose
pub const DEFAULT_UPDATE_INVALIDATES: [Invalidation; 3] =
    [Invalidation::List, Invalidation::Many, Invalidation::Detail];

/// Arguments of an update; hook-level values act as per-call defaults
pub struct UseUpdateParams<T, V> {
    pub resource: Option<String>,
    pub id: Option<BaseKey>,
    pub values: Option<V>,
    pub meta: Option<MetaQuery>,
    pub data_provider_name: Option<String>,
    pub invalidates: Option<Vec<Invalidation>>,
    pub success_notification: NotificationProp<UpdateResponse<T>, V>,
    pub error_notification: NotificationProp<HttpError, V>,
}

impl<T, V> UseUpdateParams<T, V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    pub fn id(mut self, id: impl Into<BaseKey>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn values(mut self, values: V) -> Self {
        self.values = Some(values);
        self
    }

    pub fn meta(mut self, meta: MetaQuery) -> Self {
        self.meta = Some(meta);
        self
    }

    pub fn data_provider_name(mut self, name: impl Into<String>) -> Self {
        self.data_provider_name = Some(name.into());
        self
    }

    pub fn invalidates(mut self, invalidates: impl IntoIterator<Item = Invalidation>) -> Self {
        self.invalidates = Some(invalidates.into_iter().collect());
        self
    }

    pub fn success_notification(
        mut self,
        notification: impl Into<NotificationProp<UpdateResponse<T>, V>>,
    ) -> Self {
        self.success_notification = notification.into();
        self
    }

    pub fn error_notification(
        mut self,
        notification: impl Into<NotificationProp<HttpError, V>>,
    ) -> Self {
        self.error_notification = notification.into();
        self
    }
}

impl<T, V: Clone> UseUpdateParams<T, V> {
    /// Fill whatever this call leaves unset from `defaults`
    pub fn or(self, defaults: &Self) -> Self {
        Self {
            resource: self.resource.or_else(|| defaults.resource.clone()),
            id: self.id.or_else(|| defaults.id.clone()),
            values: self.values.or_else(|| defaults.values.clone()),
            meta: self.meta.or_else(|| defaults.meta.clone()),
            data_provider_name: self
                .data_provider_name
                .or_else(|| defaults.data_provider_name.clone()),
            invalidates: self.invalidates.or_else(|| defaults.invalidates.clone()),
            success_notification: self
                .success_notification
                .or(defaults.success_notification.clone()),
            error_notification: self
                .error_notification
                .or(defaults.error_notification.clone()),
        }
    }
}

impl<T, V> Default for UseUpdateParams<T, V> {
    fn default() -> Self {
        Self {
            resource: None,
            id: None,
            values: None,
            meta: None,
            data_provider_name: None,
            invalidates: None,
            success_notification: NotificationProp::Inherit,
            error_notification: NotificationProp::Inherit,
        }
    }
}

impl<T, V: Clone> Clone for UseUpdateParams<T, V> {
    fn clone(&self) -> Self {
        Self {
            resource: self.resource.clone(),
            id: self.id.clone(),
            values: self.values.clone(),
            meta: self.meta.clone(),
            data_provider_name: self.data_provider_name.clone(),
            invalidates: self.invalidates.clone(),
            success_notification: self.success_notification.clone(),
            error_notification: self.error_notification.clone(),
        }
    }
}

/// Validate an update and prepare its provider call.
///
/// Checks run in order `id`, `values`, `resource`; the first one missing is
/// returned without touching the provider.
pub fn update<T, V>(
    context: &DataContext,
    params: UseUpdateParams<T, V>,
) -> Result<impl Future<Output = Result<UpdateResponse<T>, HttpError>> + 'static, ConfigError>
where
    T: RecordBounds,
    V: Serialize + 'static,
{
    let UseUpdateParams {
        resource,
        id,
        values,
        meta,
        data_provider_name,
        invalidates,
        success_notification,
        error_notification,
    } = params;

    let id = id.ok_or(ConfigError::MissingId { hook: "use_update" })?;
    let values = values.ok_or(ConfigError::MissingValues { hook: "use_update" })?;
    let resource = resource.ok_or(ConfigError::MissingResource { hook: "use_update" })?;
    let provider = context.resolve(data_provider_name.as_deref())?;
    let context = context.clone();

    Ok(async move {
        let key = mutation_key(provider.name(), "update");
        crate::log_mutation_start!("{} on {}/{}", key, resource, id);

        let result = async {
            let variables = serde_json::to_value(&values).map_err(HttpError::encode)?;
            provider
                .provider()
                .update(UpdateParams {
                    resource: resource.clone(),
                    id: id.clone(),
                    variables,
                    meta: meta.unwrap_or_default(),
                })
                .await?
                .decode::<T>()
        }
        .await;

        let notification_key = format!("{id}-{resource}-notification");
        OutcomeReport {
            key: &key,
            values: &values,
            resource: &resource,
            success: &success_notification,
            error: &error_notification,
            success_fallback: Some(
                OpenNotificationParams::success(format!("Successfully updated {resource}"))
                    .with_key(notification_key.clone())
                    .with_description("Success"),
            ),
        }
        .deliver(&context, &result, |error| {
            Some(
                OpenNotificationParams::error(format!(
                    "There was an error updating {resource} (status code: {})",
                    error.status_code
                ))
                .with_key(notification_key.clone())
                .with_description(error.message.clone()),
            )
        });

        if result.is_ok() {
            let invalidates = invalidates.unwrap_or_else(|| DEFAULT_UPDATE_INVALIDATES.to_vec());
            if let Err(error) = invalidate_scopes(
                context.client(),
                provider.name(),
                Some(&resource),
                Some(&id),
                &invalidates,
            ) {
                crate::error_log!("Invalidation after update failed: {}", error);
            }
        }

        result
    })
}

/// Handle returned by [`use_update`]
pub struct UseUpdate<T: 'static, V> {
    context: DataContext,
    defaults: UseUpdateParams<T, V>,
    state: Signal<MutationState<UpdateResponse<T>>>,
}

impl<T, V> UseUpdate<T, V>
where
    T: RecordBounds,
    V: Serialize + Clone + 'static,
{
    pub fn state(&self) -> Signal<MutationState<UpdateResponse<T>>> {
        self.state
    }

    /// Start an update in the background
    pub fn mutate(&self, params: UseUpdateParams<T, V>) -> Result<(), ConfigError> {
        let future = update(&self.context, params.or(&self.defaults))?;
        spawn_mutation(self.state, future);
        Ok(())
    }

    /// Start an update and await its outcome
    pub fn mutate_async(
        &self,
        params: UseUpdateParams<T, V>,
    ) -> Result<impl Future<Output = Result<UpdateResponse<T>, HttpError>> + 'static, ConfigError>
    {
        let future = update(&self.context, params.or(&self.defaults))?;
        Ok(track_mutation(self.state, future))
    }
}

impl<T: 'static, V: Clone> Clone for UseUpdate<T, V> {
    fn clone(&self) -> Self {
        Self {
            context: self.context.clone(),
            defaults: self.defaults.clone(),
            state: self.state,
        }
    }
}

/// Update records of a resource.
///
/// On success the lists, many-record results and the detail query of the
/// updated id are invalidated unless `invalidates` says otherwise.
pub fn use_update<T, V>(defaults: UseUpdateParams<T, V>) -> UseUpdate<T, V>
where
    T: RecordBounds,
    V: Serialize + Clone + 'static,
{
    let context = use_data_context();
    let state = use_signal(|| MutationState::Idle);
    UseUpdate {
        context,
        defaults,
        state,
    }
}
