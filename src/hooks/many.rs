//! `use_many`: several records by id.

use std::marker::PhantomData;

use dioxus::prelude::*;
use futures::{FutureExt, future::try_join_all};
use serde::Serialize;

use crate::{
    crud::{BaseKey, GetManyParams, GetManyResponse, GetOneParams, RecordsResponse},
    errors::{ConfigError, HttpError},
    hooks::query::{QueryOptions, QueryRequest, use_query_core},
    keys::{QueryAction, QueryKey, QueryKeyBuilder},
    registry::ResolvedProvider,
    state::QueryState,
    types::{MetaQuery, ProviderFuture, RecordBounds},
};

/// Arguments of [`use_many`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UseManyProps {
    pub resource: String,
    pub ids: Vec<BaseKey>,
    pub meta: MetaQuery,
    pub data_provider_name: Option<String>,
    pub query_options: QueryOptions,
}

impl UseManyProps {
    pub fn new<I, K>(resource: impl Into<String>, ids: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<BaseKey>,
    {
        Self {
            resource: resource.into(),
            ids: ids.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
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
struct ManyKeyParams<'a> {
    ids: &'a [BaseKey],
    #[serde(flatten)]
    meta: &'a MetaQuery,
}

#[derive(Clone, PartialEq)]
struct ManyQuery<T> {
    props: UseManyProps,
    _record: PhantomData<fn() -> T>,
}

impl<T: RecordBounds> QueryRequest for ManyQuery<T> {
    type Response = GetManyResponse;
    type Output = GetManyResponse<T>;

    fn key(&self, provider: &ResolvedProvider) -> QueryKey {
        QueryKeyBuilder::new()
            .data(provider.name())
            .resource(self.props.resource.as_str())
            .action(QueryAction::Many)
            .params(&ManyKeyParams {
                ids: &self.props.ids,
                meta: &self.props.meta,
            })
            .get()
    }

    fn options(&self) -> &QueryOptions {
        &self.props.query_options
    }

    fn fetch(&self, provider: &ResolvedProvider) -> ProviderFuture<GetManyResponse> {
        if let Some(many) = provider.many() {
            return many.get_many(GetManyParams {
                resource: self.props.resource.clone(),
                ids: self.props.ids.clone(),
                meta: self.props.meta.clone(),
            });
        }

        // One get_one per id, joined in id order
        let requests: Vec<_> = self
            .props
            .ids
            .iter()
            .map(|id| {
                provider.provider().get_one(GetOneParams {
                    resource: self.props.resource.clone(),
                    id: id.clone(),
                    meta: self.props.meta.clone(),
                })
            })
            .collect();
        async move {
            let records = try_join_all(requests).await?;
            Ok(RecordsResponse {
                data: records.into_iter().map(|record| record.data).collect(),
            })
        }
        .boxed_local()
    }

    fn decode(response: GetManyResponse) -> Result<GetManyResponse<T>, HttpError> {
        response.decode()
    }
}

/// Fetch the `resource` records with the given ids.
///
/// Providers without bulk operations are asked once per id.
pub fn use_many<T: RecordBounds>(
    props: UseManyProps,
) -> Result<Signal<QueryState<GetManyResponse<T>>>, ConfigError> {
    let data_provider_name = props.data_provider_name.clone();
    use_query_core(
        ManyQuery::<T> {
            props,
            _record: PhantomData,
        },
        data_provider_name,
    )
}
