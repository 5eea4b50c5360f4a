//! `use_one`: a single record from `get_one`.

use std::marker::PhantomData;

use dioxus::prelude::*;
use futures::FutureExt;

use crate::{
    crud::{BaseKey, GetOneParams, GetOneResponse},
    errors::{ConfigError, HttpError},
    hooks::query::{QueryOptions, QueryRequest, use_query_core},
    keys::{QueryAction, QueryKey, QueryKeyBuilder},
    registry::ResolvedProvider,
    state::QueryState,
    types::{MetaQuery, ProviderFuture, RecordBounds},
};

/// Arguments of [`use_one`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UseOneProps {
    pub resource: String,
    /// The query stays idle while this is `None`, unless forced by `query_options.enabled`
    pub id: Option<BaseKey>,
    pub meta: MetaQuery,
    pub data_provider_name: Option<String>,
    pub query_options: QueryOptions,
}

impl UseOneProps {
    pub fn new(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            ..Self::default()
        }
    }

    pub fn id(mut self, id: impl Into<BaseKey>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set or clear the id
    pub fn maybe_id(mut self, id: Option<BaseKey>) -> Self {
        self.id = id;
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

#[derive(Clone, PartialEq)]
struct OneQuery<T> {
    props: UseOneProps,
    _record: PhantomData<fn() -> T>,
}

impl<T: RecordBounds> QueryRequest for OneQuery<T> {
    type Response = GetOneResponse;
    type Output = GetOneResponse<T>;

    fn key(&self, provider: &ResolvedProvider) -> QueryKey {
        let mut key = QueryKeyBuilder::new()
            .data(provider.name())
            .resource(self.props.resource.as_str())
            .action(QueryAction::One);
        if let Some(id) = &self.props.id {
            key = key.id(id);
        }
        key.params(&self.props.meta).get()
    }

    fn options(&self) -> &QueryOptions {
        &self.props.query_options
    }

    fn enabled(&self) -> bool {
        self.props
            .query_options
            .enabled
            .unwrap_or(self.props.id.is_some())
    }

    fn validate(&self, _provider: &ResolvedProvider) -> Result<(), ConfigError> {
        if self.enabled() && self.props.id.is_none() {
            return Err(ConfigError::MissingId { hook: "use_one" });
        }
        Ok(())
    }

    fn fetch(&self, provider: &ResolvedProvider) -> ProviderFuture<GetOneResponse> {
        let Some(id) = self.props.id.clone() else {
            let error = HttpError::new(ConfigError::MissingId { hook: "use_one" }.to_string(), 0);
            return async move { Err(error) }.boxed_local();
        };
        provider.provider().get_one(GetOneParams {
            resource: self.props.resource.clone(),
            id,
            meta: self.props.meta.clone(),
        })
    }

    fn decode(response: GetOneResponse) -> Result<GetOneResponse<T>, HttpError> {
        response.decode()
    }
}

/// Fetch one `resource` record by id.
///
/// Returns [`QueryState::Idle`] while `id` is `None`.
pub fn use_one<T: RecordBounds>(
    props: UseOneProps,
) -> Result<Signal<QueryState<GetOneResponse<T>>>, ConfigError> {
    let data_provider_name = props.data_provider_name.clone();
    use_query_core(
        OneQuery::<T> {
            props,
            _record: PhantomData,
        },
        data_provider_name,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(props: UseOneProps) -> OneQuery<serde_json::Value> {
        OneQuery {
            props,
            _record: PhantomData,
        }
    }

    #[test]
    fn test_enabled_follows_id() {
        assert!(!query(UseOneProps::new("posts")).enabled());
        assert!(query(UseOneProps::new("posts").id(1_i64)).enabled());
        assert!(
            !query(
                UseOneProps::new("posts")
                    .id(1_i64)
                    .query_options(QueryOptions::new().enabled(false))
            )
            .enabled()
        );
    }
}
