//! `use_list`: a page of records from `get_list`.

use std::marker::PhantomData;

use dioxus::prelude::*;
use serde::Serialize;

use crate::{
    crud::{CrudFilter, CrudSort, GetListParams, GetListResponse},
    errors::{ConfigError, HttpError},
    hooks::query::{QueryOptions, QueryRequest, use_query_core},
    keys::{QueryAction, QueryKey, QueryKeyBuilder},
    pagination::{Pagination, PaginationMode, ResolvedPagination, resolve_pagination},
    registry::ResolvedProvider,
    state::QueryState,
    types::{MetaQuery, ProviderFuture, RecordBounds},
};

/// Arguments of [`use_list`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UseListProps {
    pub resource: String,
    pub pagination: Option<Pagination>,
    /// Legacy switch; `Some(false)` turns pagination off unless `pagination.mode` is set
    pub has_pagination: Option<bool>,
    pub sorters: Vec<CrudSort>,
    pub filters: Vec<CrudFilter>,
    pub meta: MetaQuery,
    pub data_provider_name: Option<String>,
    pub query_options: QueryOptions,
}

impl UseListProps {
    pub fn new(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            ..Self::default()
        }
    }

    pub fn pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = Some(pagination);
        self
    }

    pub fn has_pagination(mut self, has_pagination: bool) -> Self {
        self.has_pagination = Some(has_pagination);
        self
    }

    pub fn sorters(mut self, sorters: Vec<CrudSort>) -> Self {
        self.sorters = sorters;
        self
    }

    pub fn filters(mut self, filters: Vec<CrudFilter>) -> Self {
        self.filters = filters;
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

    pub(crate) fn resolved_pagination(&self) -> ResolvedPagination {
        resolve_pagination(self.has_pagination, self.pagination.as_ref())
    }
}

/// Parameter bag identifying a list in the cache.
///
/// The pagination descriptor only takes part when pages come from the server;
/// with client or no pagination every page shares one entry.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListKeyParams<'a> {
    #[serde(flatten)]
    meta: &'a MetaQuery,
    filters: &'a [CrudFilter],
    has_pagination: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pagination: Option<ResolvedPagination>,
    #[serde(skip_serializing_if = "no_sorters")]
    sorters: &'a [CrudSort],
}

fn no_sorters(sorters: &&[CrudSort]) -> bool {
    sorters.is_empty()
}

impl<'a> ListKeyParams<'a> {
    pub(crate) fn new(props: &'a UseListProps) -> Self {
        let pagination = props.resolved_pagination();
        let is_server_pagination = pagination.mode == PaginationMode::Server;
        Self {
            meta: &props.meta,
            filters: &props.filters,
            has_pagination: is_server_pagination,
            pagination: is_server_pagination.then_some(pagination),
            sorters: &props.sorters,
        }
    }
}

#[derive(Clone, PartialEq)]
struct ListQuery<T> {
    props: UseListProps,
    _record: PhantomData<fn() -> T>,
}

impl<T: RecordBounds> QueryRequest for ListQuery<T> {
    type Response = GetListResponse;
    type Output = GetListResponse<T>;

    fn key(&self, provider: &ResolvedProvider) -> QueryKey {
        QueryKeyBuilder::new()
            .data(provider.name())
            .resource(self.props.resource.as_str())
            .action(QueryAction::List)
            .params(&ListKeyParams::new(&self.props))
            .get()
    }

    fn options(&self) -> &QueryOptions {
        &self.props.query_options
    }

    fn fetch(&self, provider: &ResolvedProvider) -> ProviderFuture<GetListResponse> {
        provider.provider().get_list(GetListParams {
            resource: self.props.resource.clone(),
            pagination: self.props.resolved_pagination(),
            sorters: self.props.sorters.clone(),
            filters: self.props.filters.clone(),
            meta: self.props.meta.clone(),
            cursor: None,
        })
    }

    fn decode(response: GetListResponse) -> Result<GetListResponse<T>, HttpError> {
        response.decode()
    }
}

/// Fetch a page of `resource` records.
///
/// Identical props share one cache entry and one in-flight provider call, no
/// matter how many components use them.
///
/// ## Example
///
/// ```rust,no_run
/// use dioxus::prelude::*;
/// use dioxus_data_hooks::prelude::*;
///
/// #[derive(Debug, Clone, PartialEq, serde::Deserialize)]
/// struct Post {
///     id: u32,
///     title: String,
/// }
///
/// #[component]
/// fn Posts() -> Element {
///     let posts = use_list::<Post>(
///         UseListProps::new("posts")
///             .pagination(Pagination::new().page_size(20))
///             .sorters(vec![CrudSort::desc("id")]),
///     )?;
///
///     match &*posts.read() {
///         QueryState::Success(page) => rsx! {
///             for post in page.data.iter() {
///                 p { key: "{post.id}", "{post.title}" }
///             }
///         },
///         QueryState::Error(error) => rsx! { "{error}" },
///         _ => rsx! { "Loading..." },
///     }
/// }
/// ```
pub fn use_list<T: RecordBounds>(
    props: UseListProps,
) -> Result<Signal<QueryState<GetListResponse<T>>>, ConfigError> {
    let data_provider_name = props.data_provider_name.clone();
    use_query_core(
        ListQuery::<T> {
            props,
            _record: PhantomData,
        },
        data_provider_name,
    )
}
