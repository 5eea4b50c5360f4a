//! # Pagination
//!
//! Normalizes partial pagination requests and resolves the next/previous page
//! for incremental listing.
//!
//! ## Example
//!
//! ```rust
//! use dioxus_data_hooks::pagination::{PaginationMode, resolve_pagination};
//!
//! let pagination = resolve_pagination(None, None);
//! assert_eq!(pagination.current, 1);
//! assert_eq!(pagination.page_size, 10);
//! assert_eq!(pagination.mode, PaginationMode::Server);
//! ```

use serde::{Deserialize, Serialize};

use crate::crud::GetListResponse;

/// Page used when none is requested
pub const DEFAULT_CURRENT_PAGE: u32 = 1;

/// Page size used when none is requested
pub const DEFAULT_PAGE_SIZE: u32 = 10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaginationMode {
    Client,
    #[default]
    Server,
    Off,
}

/// A pagination request where every field is optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<PaginationMode>,
}

impl Pagination {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(mut self, current: u32) -> Self {
        self.current = Some(current);
        self
    }

    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    pub fn mode(mut self, mode: PaginationMode) -> Self {
        self.mode = Some(mode);
        self
    }
}

/// A fully populated pagination descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedPagination {
    pub current: u32,
    pub page_size: u32,
    pub mode: PaginationMode,
}

impl Default for ResolvedPagination {
    fn default() -> Self {
        resolve_pagination(None, None)
    }
}

impl From<ResolvedPagination> for Pagination {
    fn from(value: ResolvedPagination) -> Self {
        Pagination {
            current: Some(value.current),
            page_size: Some(value.page_size),
            mode: Some(value.mode),
        }
    }
}

/// Resolve a partial pagination request into a complete descriptor.
///
/// An explicit `mode` wins; otherwise `has_pagination == Some(false)` selects
/// [`PaginationMode::Off`] and anything else selects [`PaginationMode::Server`].
/// `current` and `page_size` never drop below 1.
pub fn resolve_pagination(
    has_pagination: Option<bool>,
    pagination: Option<&Pagination>,
) -> ResolvedPagination {
    let legacy_mode = if has_pagination == Some(false) {
        PaginationMode::Off
    } else {
        PaginationMode::Server
    };
    let mode = pagination.and_then(|p| p.mode).unwrap_or(legacy_mode);
    let current = pagination
        .and_then(|p| p.current)
        .unwrap_or(DEFAULT_CURRENT_PAGE)
        .max(1);
    let page_size = pagination
        .and_then(|p| p.page_size)
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .max(1);

    ResolvedPagination {
        current,
        page_size,
        mode,
    }
}

/// Provider-issued cursor tokens attached to a list result
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cursor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev: Option<String>,
}

/// Token identifying a page of an infinite list
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PageParam {
    /// Offset page number
    Page(u32),
    /// Opaque cursor token, passed back to the provider verbatim
    Token(String),
}

/// Page number a response reports, with 0 read as the first page
fn reported_page(pagination: Option<&Pagination>) -> u32 {
    pagination
        .and_then(|p| p.current)
        .filter(|current| *current > 0)
        .unwrap_or(DEFAULT_CURRENT_PAGE)
}

/// Compute the page after `last_page`, or `None` at the end of the sequence.
pub fn next_page_param<T>(last_page: &GetListResponse<T>) -> Option<PageParam> {
    if let Some(next) = last_page.cursor.as_ref().and_then(|c| c.next.clone()) {
        return Some(PageParam::Token(next));
    }

    let pagination = last_page.pagination.as_ref();
    let current = reported_page(pagination);
    let page_size = pagination
        .and_then(|p| p.page_size)
        .filter(|size| *size > 0)
        .unwrap_or(DEFAULT_PAGE_SIZE);
    let total_pages = last_page.total.div_ceil(u64::from(page_size));

    if u64::from(current) < total_pages {
        current.checked_add(1).map(PageParam::Page)
    } else {
        None
    }
}

/// Compute the page before `first_page`, or `None` when it is the first page.
pub fn previous_page_param<T>(first_page: &GetListResponse<T>) -> Option<PageParam> {
    if let Some(prev) = first_page.cursor.as_ref().and_then(|c| c.prev.clone()) {
        return Some(PageParam::Token(prev));
    }

    let current = reported_page(first_page.pagination.as_ref());

    (current > 1).then(|| PageParam::Page(current - 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(total: u64, current: Option<u32>, page_size: Option<u32>) -> GetListResponse<()> {
        let mut response = GetListResponse::new(Vec::new(), total);
        response.pagination = Some(Pagination {
            current,
            page_size,
            mode: None,
        });
        response
    }

    #[test]
    fn test_empty_request_resolves_to_defaults() {
        assert_eq!(
            resolve_pagination(None, Some(&Pagination::default())),
            ResolvedPagination {
                current: 1,
                page_size: 10,
                mode: PaginationMode::Server,
            }
        );
    }

    #[test]
    fn test_mode_precedence() {
        assert_eq!(resolve_pagination(Some(false), None).mode, PaginationMode::Off);
        assert_eq!(resolve_pagination(Some(true), None).mode, PaginationMode::Server);

        let explicit = Pagination::new().mode(PaginationMode::Client);
        assert_eq!(
            resolve_pagination(Some(false), Some(&explicit)).mode,
            PaginationMode::Client
        );
    }

    #[test]
    fn test_resolved_values_never_drop_below_one() {
        for current in [None, Some(0), Some(1), Some(7)] {
            for page_size in [None, Some(0), Some(25)] {
                for has_pagination in [None, Some(true), Some(false)] {
                    let request = Pagination {
                        current,
                        page_size,
                        mode: None,
                    };
                    let resolved = resolve_pagination(has_pagination, Some(&request));
                    assert!(resolved.current >= 1);
                    assert!(resolved.page_size >= 1);
                }
            }
        }
    }

    #[test]
    fn test_next_page_from_totals() {
        assert_eq!(
            next_page_param(&page(25, Some(2), Some(10))),
            Some(PageParam::Page(3))
        );
        assert_eq!(next_page_param(&page(25, Some(3), Some(10))), None);
    }

    #[test]
    fn test_last_representable_page_has_no_successor() {
        assert_eq!(next_page_param(&page(u64::MAX, Some(u32::MAX), Some(1))), None);
    }

    #[test]
    fn test_page_zero_reads_as_first_page() {
        assert_eq!(
            next_page_param(&page(25, Some(0), Some(10))),
            Some(PageParam::Page(2))
        );
        assert_eq!(previous_page_param(&page(25, Some(0), Some(10))), None);
    }

    #[test]
    fn test_missing_total_never_advances() {
        let response = GetListResponse::<()>::new(Vec::new(), 0);
        assert_eq!(next_page_param(&response), None);
        assert_eq!(previous_page_param(&response), None);
    }

    #[test]
    fn test_missing_page_size_defaults_to_ten() {
        assert_eq!(
            next_page_param(&page(11, Some(1), None)),
            Some(PageParam::Page(2))
        );
        assert_eq!(next_page_param(&page(10, Some(1), None)), None);
    }

    #[test]
    fn test_cursor_tokens_take_precedence() {
        let mut response = page(0, Some(1), Some(10));
        response.cursor = Some(Cursor {
            next: Some("after:42".to_string()),
            prev: Some("before:41".to_string()),
        });

        assert_eq!(
            next_page_param(&response),
            Some(PageParam::Token("after:42".to_string()))
        );
        assert_eq!(
            previous_page_param(&response),
            Some(PageParam::Token("before:41".to_string()))
        );
    }

    #[test]
    fn test_next_then_previous_returns_to_start() {
        for current in 1..5u32 {
            let start = page(100, Some(current), Some(10));
            let Some(PageParam::Page(next)) = next_page_param(&start) else {
                panic!("page {current} of 10 should have a successor");
            };
            let moved = page(100, Some(next), Some(10));
            assert_eq!(
                previous_page_param(&moved),
                Some(PageParam::Page(current))
            );
        }
    }
}
