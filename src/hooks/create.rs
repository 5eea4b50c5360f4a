//! `use_create`: create a record through the provider.

use std::future::Future;

use dioxus::prelude::*;
use serde::Serialize;

use crate::{
    context::{DataContext, use_data_context},
    crud::{CreateParams, CreateResponse},
    errors::{ConfigError, HttpError},
    hooks::{
        invalidate::{Invalidation, invalidate_scopes},
        mutation::{OutcomeReport, mutation_key, spawn_mutation, track_mutation},
    },
    notification::{NotificationProp, OpenNotificationParams},
    state::MutationState,
    types::{MetaQuery, RecordBounds},
};

/// Scopes invalidated after a create when the caller does not choose
pub const DEFAULT_CREATE_INVALIDATES: [Invalidation; 2] = [Invalidation::List, Invalidation::Many];

/// Arguments of a create.
///
/// Everything is optional here; the values given to [`use_create`] act as
/// defaults for each [`UseCreate::mutate`] call.
pub struct UseCreateParams<T, V> {
    pub resource: Option<String>,
    pub values: Option<V>,
    pub meta: Option<MetaQuery>,
    pub data_provider_name: Option<String>,
    pub invalidates: Option<Vec<Invalidation>>,
    pub success_notification: NotificationProp<CreateResponse<T>, V>,
    pub error_notification: NotificationProp<HttpError, V>,
}

impl<T, V> UseCreateParams<T, V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
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
        notification: impl Into<NotificationProp<CreateResponse<T>, V>>,
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

impl<T, V: Clone> UseCreateParams<T, V> {
    /// Fill whatever this call leaves unset from `defaults`
    pub fn or(self, defaults: &Self) -> Self {
        Self {
            resource: self.resource.or_else(|| defaults.resource.clone()),
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

impl<T, V> Default for UseCreateParams<T, V> {
    fn default() -> Self {
        Self {
            resource: None,
            values: None,
            meta: None,
            data_provider_name: None,
            invalidates: None,
            success_notification: NotificationProp::Inherit,
            error_notification: NotificationProp::Inherit,
        }
    }
}

impl<T, V: Clone> Clone for UseCreateParams<T, V> {
    fn clone(&self) -> Self {
        Self {
            resource: self.resource.clone(),
            values: self.values.clone(),
            meta: self.meta.clone(),
            data_provider_name: self.data_provider_name.clone(),
            invalidates: self.invalidates.clone(),
            success_notification: self.success_notification.clone(),
            error_notification: self.error_notification.clone(),
        }
    }
}

/// Validate a create and prepare its provider call.
///
/// Missing values or resource are reported right away, without touching the
/// provider. The returned future performs the call, notifies, reports failures
/// to the error handler and invalidates the affected queries on success.
pub fn create<T, V>(
    context: &DataContext,
    params: UseCreateParams<T, V>,
) -> Result<impl Future<Output = Result<CreateResponse<T>, HttpError>> + 'static, ConfigError>
where
    T: RecordBounds,
    V: Serialize + 'static,
{
    let UseCreateParams {
        resource,
        values,
        meta,
        data_provider_name,
        invalidates,
        success_notification,
        error_notification,
    } = params;

    let values = values.ok_or(ConfigError::MissingValues { hook: "use_create" })?;
    let resource = resource.ok_or(ConfigError::MissingResource { hook: "use_create" })?;
    let provider = context.resolve(data_provider_name.as_deref())?;
    let context = context.clone();

    Ok(async move {
        let key = mutation_key(provider.name(), "create");
        crate::log_mutation_start!("{} on {}", key, resource);

        let result = async {
            let variables = serde_json::to_value(&values).map_err(HttpError::encode)?;
            provider
                .provider()
                .create(CreateParams {
                    resource: resource.clone(),
                    variables,
                    meta: meta.unwrap_or_default(),
                })
                .await?
                .decode::<T>()
        }
        .await;

        OutcomeReport {
            key: &key,
            values: &values,
            resource: &resource,
            success: &success_notification,
            error: &error_notification,
            success_fallback: Some(
                OpenNotificationParams::success(format!("Successfully created {resource}"))
                    .with_key("create-notification")
                    .with_description("Success"),
            ),
        }
        .deliver(&context, &result, |error| {
            Some(
                OpenNotificationParams::error(format!(
                    "There was an error creating {resource} (status code: {})",
                    error.status_code
                ))
                .with_key("create-notification")
                .with_description(error.message.clone()),
            )
        });

        if result.is_ok() {
            let invalidates = invalidates.unwrap_or_else(|| DEFAULT_CREATE_INVALIDATES.to_vec());
            if let Err(error) = invalidate_scopes(
                context.client(),
                provider.name(),
                Some(&resource),
                None,
                &invalidates,
            ) {
                crate::error_log!("Invalidation after create failed: {}", error);
            }
        }

        result
    })
}

/// Handle returned by [`use_create`]
pub struct UseCreate<T: 'static, V> {
    context: DataContext,
    defaults: UseCreateParams<T, V>,
    state: Signal<MutationState<CreateResponse<T>>>,
}

impl<T, V> UseCreate<T, V>
where
    T: RecordBounds,
    V: Serialize + Clone + 'static,
{
    /// Outcome of the latest call
    pub fn state(&self) -> Signal<MutationState<CreateResponse<T>>> {
        self.state
    }

    /// Start a create in the background
    pub fn mutate(&self, params: UseCreateParams<T, V>) -> Result<(), ConfigError> {
        let future = create(&self.context, params.or(&self.defaults))?;
        spawn_mutation(self.state, future);
        Ok(())
    }

    /// Start a create and await its outcome
    pub fn mutate_async(
        &self,
        params: UseCreateParams<T, V>,
    ) -> Result<impl Future<Output = Result<CreateResponse<T>, HttpError>> + 'static, ConfigError>
    {
        let future = create(&self.context, params.or(&self.defaults))?;
        Ok(track_mutation(self.state, future))
    }
}

impl<T: 'static, V: Clone> Clone for UseCreate<T, V> {
    fn clone(&self) -> Self {
        Self {
            context: self.context.clone(),
            defaults: self.defaults.clone(),
            state: self.state,
        }
    }
}

/// Create records of a resource.
///
/// ## Example
///
/// ```rust,no_run
/// use dioxus::prelude::*;
/// use dioxus_data_hooks::prelude::*;
///
/// #[component]
/// fn NewPost() -> Element {
///     let create = use_create::<serde_json::Value, serde_json::Value>(
///         UseCreateParams::new().resource("posts"),
///     );
///
///     rsx! {
///         button {
///             onclick: move |_| {
///                 let values = serde_json::json!({ "title": "Hello" });
///                 if let Err(error) = create.mutate(UseCreateParams::new().values(values)) {
///                     eprintln!("{error}");
///                 }
///             },
///             "Create"
///         }
///     }
/// }
/// ```
pub fn use_create<T, V>(defaults: UseCreateParams<T, V>) -> UseCreate<T, V>
where
    T: RecordBounds,
    V: Serialize + Clone + 'static,
{
    let context = use_data_context();
    let state = use_signal(|| MutationState::Idle);
    UseCreate {
        context,
        defaults,
        state,
    }
}
