//! `use_infinite_list`: list pages fetched one after another.
//!
//! The first page is fetched like any query and cached under an `infinite`
//! key. [`UseInfiniteList::fetch_next_page`] and
//! [`UseInfiniteList::fetch_previous_page`] extend the cached pages in place,
//! so every component reading the same list sees the new page.
//!
//! Each page records the pagination it was fetched with. The next page comes
//! from the provider's cursor when it returns one, otherwise from the page
//! count implied by `total`. Once a page came from a cursor token the list
//! only continues through tokens.

use std::marker::PhantomData;

use dioxus::prelude::*;

use crate::{
    context::{DataContext, use_data_context},
    crud::{GetListParams, GetListResponse},
    errors::{ConfigError, HttpError},
    hooks::{
        list::{ListKeyParams, UseListProps},
        query::{QueryOptions, QueryRequest, use_query_core},
    },
    keys::{QueryAction, QueryKey, QueryKeyBuilder},
    pagination::{PageParam, Pagination, next_page_param, previous_page_param},
    registry::ResolvedProvider,
    state::QueryState,
    types::{BaseRecord, ProviderFuture, RecordBounds},
};

/// Pages fetched so far, in display order
#[derive(Debug, Clone, PartialEq)]
pub struct InfiniteData<T = BaseRecord> {
    pub pages: Vec<GetListResponse<T>>,
    /// The parameter each page was fetched with, parallel to `pages`
    pub page_params: Vec<PageParam>,
}

impl<T> InfiniteData<T> {
    /// Records of every page, flattened
    pub fn records(&self) -> impl Iterator<Item = &T> {
        self.pages.iter().flat_map(|page| page.data.iter())
    }

    /// Param of the page after the last one.
    ///
    /// A page reached through a cursor token only continues through its own
    /// `cursor.next`; it never falls back to page numbers.
    pub fn next_page_param(&self) -> Option<PageParam> {
        let last = self.pages.last()?;
        match self.page_params.last() {
            Some(PageParam::Token(_)) => cursor_token(last.cursor.as_ref()?.next.as_ref()),
            _ => next_page_param(last),
        }
    }

    pub fn previous_page_param(&self) -> Option<PageParam> {
        let first = self.pages.first()?;
        match self.page_params.first() {
            Some(PageParam::Token(_)) => cursor_token(first.cursor.as_ref()?.prev.as_ref()),
            _ => previous_page_param(first),
        }
    }
}

impl InfiniteData<BaseRecord> {
    pub fn decode<T: RecordBounds>(self) -> Result<InfiniteData<T>, HttpError> {
        let pages = self
            .pages
            .into_iter()
            .map(|page| page.decode::<T>())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(InfiniteData {
            pages,
            page_params: self.page_params,
        })
    }
}

fn cursor_token(token: Option<&String>) -> Option<PageParam> {
    token.cloned().map(PageParam::Token)
}

/// Direction of a page fetch in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageDirection {
    Next,
    Previous,
}

/// Fetch the page addressed by `param`, with the pagination it used attached
fn fetch_page(
    provider: &ResolvedProvider,
    props: &UseListProps,
    param: &PageParam,
) -> ProviderFuture<GetListResponse> {
    let mut pagination = props.resolved_pagination();
    let cursor = match param {
        PageParam::Page(current) => {
            pagination.current = *current;
            None
        }
        PageParam::Token(token) => Some(token.clone()),
    };
    // Token pages have no page number of their own
    let used = Pagination {
        current: cursor.is_none().then_some(pagination.current),
        ..Pagination::from(pagination)
    };
    let request = provider.provider().get_list(GetListParams {
        resource: props.resource.clone(),
        pagination,
        sorters: props.sorters.clone(),
        filters: props.filters.clone(),
        meta: props.meta.clone(),
        cursor,
    });
    Box::pin(async move {
        let mut page = request.await?;
        page.pagination = Some(used);
        Ok(page)
    })
}

fn infinite_key(provider: &ResolvedProvider, props: &UseListProps) -> QueryKey {
    QueryKeyBuilder::new()
        .data(provider.name())
        .resource(props.resource.as_str())
        .action(QueryAction::Infinite)
        .params(&ListKeyParams::new(props))
        .get()
}

#[derive(Clone, PartialEq)]
struct InfiniteQuery<T> {
    props: UseListProps,
    _record: PhantomData<fn() -> T>,
}

impl<T: RecordBounds> QueryRequest for InfiniteQuery<T> {
    type Response = InfiniteData;
    type Output = InfiniteData<T>;

    fn key(&self, provider: &ResolvedProvider) -> QueryKey {
        infinite_key(provider, &self.props)
    }

    fn options(&self) -> &QueryOptions {
        &self.props.query_options
    }

    fn fetch(&self, provider: &ResolvedProvider) -> ProviderFuture<InfiniteData> {
        let first = PageParam::Page(self.props.resolved_pagination().current);
        let request = fetch_page(provider, &self.props, &first);
        Box::pin(async move {
            let page = request.await?;
            Ok(InfiniteData {
                pages: vec![page],
                page_params: vec![first],
            })
        })
    }

    fn decode(response: InfiniteData) -> Result<InfiniteData<T>, HttpError> {
        response.decode()
    }
}

/// Handle returned by [`use_infinite_list`]
pub struct UseInfiniteList<T: 'static> {
    context: DataContext,
    provider: ResolvedProvider,
    props: UseListProps,
    state: Signal<QueryState<InfiniteData<T>>>,
    fetching: Signal<Option<PageDirection>>,
    page_error: Signal<Option<HttpError>>,
}

impl<T: RecordBounds> UseInfiniteList<T> {
    /// Pages fetched so far
    pub fn state(&self) -> Signal<QueryState<InfiniteData<T>>> {
        self.state
    }

    /// The error of the latest failed next/previous page fetch, cleared by the
    /// next attempt
    pub fn page_error(&self) -> Signal<Option<HttpError>> {
        self.page_error
    }

    pub fn has_next_page(&self) -> bool {
        self.state
            .read()
            .data()
            .is_some_and(|data| data.next_page_param().is_some())
    }

    pub fn has_previous_page(&self) -> bool {
        self.state
            .read()
            .data()
            .is_some_and(|data| data.previous_page_param().is_some())
    }

    pub fn is_fetching_next_page(&self) -> bool {
        *self.fetching.read() == Some(PageDirection::Next)
    }

    pub fn is_fetching_previous_page(&self) -> bool {
        *self.fetching.read() == Some(PageDirection::Previous)
    }

    /// Append the page after the last one. Does nothing at the end of the list
    /// or while another page is loading.
    pub fn fetch_next_page(&self) {
        self.load_page(PageDirection::Next);
    }

    /// Prepend the page before the first one. Does nothing on the first page
    /// or while another page is loading.
    pub fn fetch_previous_page(&self) {
        self.load_page(PageDirection::Previous);
    }

    fn load_page(&self, direction: PageDirection) {
        if self.fetching.peek().is_some() {
            return;
        }

        let client = self.context.client().clone();
        let key = infinite_key(&self.provider, &self.props);
        let Some(Ok(data)) = client.get_query_data::<InfiniteData>(&key, None) else {
            return;
        };
        let param = match direction {
            PageDirection::Next => data.next_page_param(),
            PageDirection::Previous => data.previous_page_param(),
        };
        let Some(param) = param else {
            return;
        };

        crate::log_query_start!("Fetching {:?} page {:?} for key: {}", direction, param, key);
        let request = fetch_page(&self.provider, &self.props, &param);
        let on_error = self.context.error_handler();
        let mut fetching = self.fetching;
        let mut page_error = self.page_error;
        fetching.set(Some(direction));
        page_error.set(None);

        spawn(async move {
            match request.await {
                Ok(page) => {
                    // Pages may have changed while this one was loading
                    let mut data = match client.get_query_data::<InfiniteData>(&key, None) {
                        Some(Ok(current)) => current,
                        _ => data,
                    };
                    match direction {
                        PageDirection::Next => {
                            data.pages.push(page);
                            data.page_params.push(param);
                        }
                        PageDirection::Previous => {
                            data.pages.insert(0, page);
                            data.page_params.insert(0, param);
                        }
                    }
                    client.set_query_data(key, Ok(data));
                }
                Err(error) => {
                    on_error(&error);
                    page_error.set(Some(error));
                }
            }
            fetching.set(None);
        });
    }
}

impl<T: 'static> Clone for UseInfiniteList<T> {
    fn clone(&self) -> Self {
        Self {
            context: self.context.clone(),
            provider: self.provider.clone(),
            props: self.props.clone(),
            state: self.state,
            fetching: self.fetching,
            page_error: self.page_error,
        }
    }
}

/// Fetch a list page by page.
///
/// Takes the same props as [`use_list`](crate::hooks::use_list); the
/// pagination's `current` is the first page fetched.
pub fn use_infinite_list<T: RecordBounds>(
    props: UseListProps,
) -> Result<UseInfiniteList<T>, ConfigError> {
    let context = use_data_context();
    let fetching = use_signal(|| None);
    let page_error = use_signal(|| None);
    let data_provider_name = props.data_provider_name.clone();
    let state = use_query_core(
        InfiniteQuery::<T> {
            props: props.clone(),
            _record: PhantomData,
        },
        data_provider_name.clone(),
    )?;
    let provider = context.resolve(data_provider_name.as_deref())?;

    Ok(UseInfiniteList {
        context,
        provider,
        props,
        state,
        fetching,
        page_error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::Cursor;
    use serde_json::json;

    fn page(current: u32, total: u64) -> GetListResponse {
        let mut page = GetListResponse::new(vec![json!({ "id": current })], total);
        page.pagination = Some(Pagination::new().current(current).page_size(1));
        page
    }

    #[test]
    fn test_page_params_follow_first_and_last_page() {
        let data = InfiniteData {
            pages: vec![page(2, 3), page(3, 3)],
            page_params: vec![PageParam::Page(2), PageParam::Page(3)],
        };
        assert_eq!(data.next_page_param(), None);
        assert_eq!(data.previous_page_param(), Some(PageParam::Page(1)));
        assert_eq!(data.records().count(), 2);
    }

    #[test]
    fn test_cursor_stream_ends_without_next_token() {
        let mut first = page(1, 20);
        first.pagination = Some(Pagination::new().current(1).page_size(10));
        first.cursor = Some(Cursor {
            next: Some("c2".to_string()),
            prev: None,
        });
        let mut last = page(2, 20);
        last.pagination = Some(Pagination::new().page_size(10));

        let data = InfiniteData {
            pages: vec![first, last],
            page_params: vec![PageParam::Page(1), PageParam::Token("c2".to_string())],
        };
        assert_eq!(data.next_page_param(), None);
        assert_eq!(data.previous_page_param(), None);
    }

    #[test]
    fn test_decode_keeps_page_params() {
        let data = InfiniteData {
            pages: vec![page(1, 2)],
            page_params: vec![PageParam::Page(1)],
        };
        let decoded = data.decode::<serde_json::Value>().unwrap();
        assert_eq!(decoded.page_params, vec![PageParam::Page(1)]);
        assert_eq!(decoded.next_page_param(), Some(PageParam::Page(2)));
    }
}
