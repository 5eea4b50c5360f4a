//! `use_custom_mutation`: fire a custom request that writes.

use std::future::Future;

use dioxus::prelude::*;
use serde::Serialize;

use crate::{
    context::{DataContext, use_data_context},
    crud::{CustomParams, CustomResponse, HttpMethod},
    errors::{ConfigError, HttpError},
    hooks::{
        custom::CustomConfig,
        mutation::{OutcomeReport, mutation_key, spawn_mutation, track_mutation},
    },
    notification::{NotificationProp, OpenNotificationParams},
    state::MutationState,
    types::{BaseRecord, MetaQuery, RecordBounds},
};

/// Arguments of one custom mutation call.
///
/// Unlike create and update, nothing is taken from the hook; every call
/// carries its own request.
pub struct UseCustomMutationParams<T, V> {
    pub url: String,
    pub method: HttpMethod,
    /// Sent as the request payload; `null` sends none
    pub values: V,
    pub meta: MetaQuery,
    pub config: CustomConfig,
    pub data_provider_name: Option<String>,
    /// Callbacks receive the request's `config` merged with `meta`
    pub success_notification: NotificationProp<CustomResponse<T>, BaseRecord>,
    pub error_notification: NotificationProp<HttpError, BaseRecord>,
}

impl<T, V> UseCustomMutationParams<T, V> {
    pub fn new(url: impl Into<String>, method: HttpMethod, values: V) -> Self {
        Self {
            url: url.into(),
            method,
            values,
            meta: MetaQuery::new(),
            config: CustomConfig::default(),
            data_provider_name: None,
            success_notification: NotificationProp::Inherit,
            error_notification: NotificationProp::Inherit,
        }
    }

    pub fn meta(mut self, meta: MetaQuery) -> Self {
        self.meta = meta;
        self
    }

    pub fn config(mut self, config: CustomConfig) -> Self {
        self.config = config;
        self
    }

    pub fn data_provider_name(mut self, name: impl Into<String>) -> Self {
        self.data_provider_name = Some(name.into());
        self
    }

    pub fn success_notification(
        mut self,
        notification: impl Into<NotificationProp<CustomResponse<T>, BaseRecord>>,
    ) -> Self {
        self.success_notification = notification.into();
        self
    }

    pub fn error_notification(
        mut self,
        notification: impl Into<NotificationProp<HttpError, BaseRecord>>,
    ) -> Self {
        self.error_notification = notification.into();
        self
    }
}

/// Validate a custom mutation and prepare its provider call.
///
/// A provider without the custom capability is reported right away. Success
/// notifications are only shown when the caller asks for one; errors fall back
/// to the translated `notifications.error` message.
pub fn custom_mutation<T, V>(
    context: &DataContext,
    params: UseCustomMutationParams<T, V>,
) -> Result<impl Future<Output = Result<CustomResponse<T>, HttpError>> + 'static, ConfigError>
where
    T: RecordBounds,
    V: Serialize + 'static,
{
    let UseCustomMutationParams {
        url,
        method,
        values,
        meta,
        config,
        data_provider_name,
        success_notification,
        error_notification,
    } = params;

    let provider = context.resolve(data_provider_name.as_deref())?;
    let custom = provider.custom()?.clone();
    let context = context.clone();
    let variables = notification_variables(&config, &meta);

    Ok(async move {
        let key = mutation_key(provider.name(), "customMutation");
        crate::log_mutation_start!("{} {} {}", key, method, url);

        let result = async {
            let payload = match serde_json::to_value(&values).map_err(HttpError::encode)? {
                serde_json::Value::Null => None,
                payload => Some(payload),
            };
            custom
                .custom(CustomParams {
                    url: url.clone(),
                    method,
                    sorters: config.sorters,
                    filters: config.filters,
                    payload,
                    query: config.query,
                    headers: config.headers,
                    meta,
                })
                .await?
                .decode::<T>()
        }
        .await;

        let translator = context.translator().clone();
        OutcomeReport {
            key: &key,
            values: &variables,
            resource: &url,
            success: &success_notification,
            error: &error_notification,
            success_fallback: None,
        }
        .deliver(&context, &result, |error| {
            let message = translator.translate(
                "notifications.error",
                Some(&serde_json::json!({ "statusCode": error.status_code })),
                Some(&format!("Error (status code: {})", error.status_code)),
            );
            Some(
                OpenNotificationParams::error(message)
                    .with_key(format!("{method}-notification"))
                    .with_description(error.message.clone()),
            )
        });

        result
    })
}

/// `config` with `meta` merged over it, as handed to notification callbacks
fn notification_variables(config: &CustomConfig, meta: &MetaQuery) -> BaseRecord {
    let mut variables = match serde_json::to_value(config) {
        Ok(BaseRecord::Object(map)) => map,
        _ => MetaQuery::new(),
    };
    variables.extend(meta.iter().map(|(key, value)| (key.clone(), value.clone())));
    BaseRecord::Object(variables)
}

/// Handle returned by [`use_custom_mutation`]
pub struct UseCustomMutation<T: 'static> {
    context: DataContext,
    state: Signal<MutationState<CustomResponse<T>>>,
}

impl<T: RecordBounds> UseCustomMutation<T> {
    pub fn state(&self) -> Signal<MutationState<CustomResponse<T>>> {
        self.state
    }

    /// Start a custom mutation in the background
    pub fn mutate<V>(&self, params: UseCustomMutationParams<T, V>) -> Result<(), ConfigError>
    where
        V: Serialize + 'static,
    {
        let future = custom_mutation(&self.context, params)?;
        spawn_mutation(self.state, future);
        Ok(())
    }

    /// Start a custom mutation and await its outcome
    pub fn mutate_async<V>(
        &self,
        params: UseCustomMutationParams<T, V>,
    ) -> Result<impl Future<Output = Result<CustomResponse<T>, HttpError>> + 'static, ConfigError>
    where
        V: Serialize + 'static,
    {
        let future = custom_mutation(&self.context, params)?;
        Ok(track_mutation(self.state, future))
    }
}

impl<T: 'static> Clone for UseCustomMutation<T> {
    fn clone(&self) -> Self {
        Self {
            context: self.context.clone(),
            state: self.state,
        }
    }
}

/// Send custom writes through the provider's `custom` capability
pub fn use_custom_mutation<T: RecordBounds>() -> UseCustomMutation<T> {
    let context = use_data_context();
    let state = use_signal(|| MutationState::Idle);
    UseCustomMutation { context, state }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_notification_variables_merge_meta_over_config() {
        let config = CustomConfig {
            query: Some(json!({ "draft": true })),
            headers: [("x-tenant".to_string(), "acme".to_string())].into(),
            ..CustomConfig::default()
        };
        let mut meta = MetaQuery::new();
        meta.insert("query".to_string(), json!("overridden"));
        meta.insert("audit".to_string(), json!(true));

        assert_eq!(
            notification_variables(&config, &meta),
            json!({
                "query": "overridden",
                "headers": { "x-tenant": "acme" },
                "audit": true,
            })
        );
    }
}
