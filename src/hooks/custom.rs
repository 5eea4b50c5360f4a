//! `use_custom`: a cached arbitrary request through the provider's `custom`.

use std::{collections::BTreeMap, marker::PhantomData};

use dioxus::prelude::*;
use serde::Serialize;

use crate::{
    crud::{CrudFilter, CrudSort, CustomParams, CustomResponse, HttpMethod},
    errors::{ConfigError, HttpError},
    hooks::query::{QueryOptions, QueryRequest, use_query_core},
    keys::{QueryAction, QueryKey, QueryKeyBuilder},
    registry::ResolvedProvider,
    state::QueryState,
    types::{MetaQuery, ProviderFuture, RecordBounds},
};

/// Request shaping forwarded to `custom`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CustomConfig {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sorters: Vec<CrudSort>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<CrudFilter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
}

/// Arguments of [`use_custom`]
#[derive(Debug, Clone, PartialEq)]
pub struct UseCustomProps {
    pub url: String,
    pub method: HttpMethod,
    pub config: CustomConfig,
    pub meta: MetaQuery,
    pub data_provider_name: Option<String>,
    pub query_options: QueryOptions,
}

impl UseCustomProps {
    pub fn new(url: impl Into<String>, method: HttpMethod) -> Self {
        Self {
            url: url.into(),
            method,
            config: CustomConfig::default(),
            meta: MetaQuery::new(),
            data_provider_name: None,
            query_options: QueryOptions::default(),
        }
    }

    pub fn config(mut self, config: CustomConfig) -> Self {
        self.config = config;
        self
    }

    pub fn meta(mut self, meta: MetaQuery) -> Self {
        self.meta = meta;
        self
    }

    pub fn data_provider_name(mut self, name: impl Into<String>) -> Self {
        self.data_provider_name = Some(name.into());
        self
    }

    pub fn query_options(mut self, options: QueryOptions) -> Self {
        self.query_options = options;
        self
    }
}

#[derive(Serialize)]
struct CustomKeyParams<'a> {
    method: HttpMethod,
    url: &'a str,
    #[serde(flatten)]
    config: &'a CustomConfig,
}

#[derive(Clone, PartialEq)]
struct CustomQuery<T> {
    props: UseCustomProps,
    _record: PhantomData<fn() -> T>,
}

impl<T: RecordBounds> QueryRequest for CustomQuery<T> {
    type Response = CustomResponse;
    type Output = CustomResponse<T>;

    fn key(&self, provider: &ResolvedProvider) -> QueryKey {
        QueryKeyBuilder::new()
            .data(provider.name())
            .action(QueryAction::Custom)
            .params(&CustomKeyParams {
                method: self.props.method,
                url: &self.props.url,
                config: &self.props.config,
            })
            .get()
    }

    fn options(&self) -> &QueryOptions {
        &self.props.query_options
    }

    fn validate(&self, provider: &ResolvedProvider) -> Result<(), ConfigError> {
        provider.custom().map(|_| ())
    }

    fn fetch(&self, provider: &ResolvedProvider) -> ProviderFuture<CustomResponse> {
        let config = self.props.config.clone();
        let params = CustomParams {
            url: self.props.url.clone(),
            method: self.props.method,
            sorters: config.sorters,
            filters: config.filters,
            payload: config.payload,
            query: config.query,
            headers: config.headers,
            meta: self.props.meta.clone(),
        };
        match provider.custom() {
            Ok(custom) => custom.custom(params),
            Err(error) => {
                let error = HttpError::new(error.to_string(), 0);
                Box::pin(async move { Err(error) })
            }
        }
    }

    fn decode(response: CustomResponse) -> Result<CustomResponse<T>, HttpError> {
        response.decode()
    }
}

/// Run a cached custom request.
///
/// Returns [`ConfigError::CustomNotImplemented`] right away when the provider
/// has no `custom` capability.
pub fn use_custom<T: RecordBounds>(
    props: UseCustomProps,
) -> Result<Signal<QueryState<CustomResponse<T>>>, ConfigError> {
    let data_provider_name = props.data_provider_name.clone();
    use_query_core(
        CustomQuery::<T> {
            props,
            _record: PhantomData,
        },
        data_provider_name,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::canonical_json;

    #[test]
    fn test_key_params_include_request_shape() {
        let mut config = CustomConfig::default();
        config.query = Some(serde_json::json!({ "q": "rust" }));
        let rendered = canonical_json(&CustomKeyParams {
            method: HttpMethod::Get,
            url: "/search",
            config: &config,
        });
        assert_eq!(rendered, r#"{"method":"get","query":{"q":"rust"},"url":"/search"}"#);
    }
}
