//! Cache invalidation by scope.
//!
//! Writes mark the queries they may have changed as stale. Every scope maps to
//! a key prefix, so invalidating `List` for `posts` drops every cached page of
//! `posts` whatever its filters, sorters or pagination, and re-runs the hooks
//! showing them.

use dioxus::prelude::*;

use crate::{
    context::{DataContext, use_data_context},
    crud::BaseKey,
    errors::ConfigError,
    keys::{QueryAction, QueryKey, QueryKeyBuilder},
    runtime::QueryClient,
};

/// A group of cached queries to invalidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Invalidation {
    /// Everything read through the provider
    All,
    /// Everything about the resource
    Resource,
    /// List and infinite-list pages of the resource
    List,
    /// `use_many` results of the resource
    Many,
    /// The `use_one` result for the id, or every one of them without an id
    Detail,
}

/// What [`invalidate`] should drop
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvalidateParams {
    pub resource: Option<String>,
    pub id: Option<BaseKey>,
    pub data_provider_name: Option<String>,
    pub invalidates: Vec<Invalidation>,
}

impl InvalidateParams {
    pub fn new(invalidates: impl IntoIterator<Item = Invalidation>) -> Self {
        Self {
            invalidates: invalidates.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    pub fn id(mut self, id: impl Into<BaseKey>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn data_provider_name(mut self, name: impl Into<String>) -> Self {
        self.data_provider_name = Some(name.into());
        self
    }
}

/// Key prefixes covered by one scope
pub fn invalidation_prefixes(
    provider: &str,
    resource: Option<&str>,
    id: Option<&BaseKey>,
    invalidation: Invalidation,
) -> Result<Vec<QueryKey>, ConfigError> {
    let scope = QueryKeyBuilder::new().data(provider);
    if invalidation == Invalidation::All {
        return Ok(vec![scope.get()]);
    }

    let resource = resource.ok_or(ConfigError::MissingResource {
        hook: "use_invalidate",
    })?;
    let scope = scope.resource(resource);
    let prefixes = match invalidation {
        Invalidation::All | Invalidation::Resource => vec![scope.get()],
        Invalidation::List => vec![
            scope.clone().action(QueryAction::List).get(),
            scope.action(QueryAction::Infinite).get(),
        ],
        Invalidation::Many => vec![scope.action(QueryAction::Many).get()],
        Invalidation::Detail => {
            let scope = scope.action(QueryAction::One);
            match id {
                Some(id) => vec![scope.id(id).get()],
                None => vec![scope.get()],
            }
        }
    };
    Ok(prefixes)
}

/// Invalidate the requested scopes. Returns how many active query keys were
/// refreshed.
pub fn invalidate(context: &DataContext, params: &InvalidateParams) -> Result<usize, ConfigError> {
    let provider = context.resolve(params.data_provider_name.as_deref())?;
    invalidate_scopes(
        context.client(),
        provider.name(),
        params.resource.as_deref(),
        params.id.as_ref(),
        &params.invalidates,
    )
}

/// Invalidate scopes of an already resolved provider
pub(crate) fn invalidate_scopes(
    client: &QueryClient,
    provider: &str,
    resource: Option<&str>,
    id: Option<&BaseKey>,
    invalidates: &[Invalidation],
) -> Result<usize, ConfigError> {
    let mut refreshed = 0;
    for invalidation in invalidates {
        for prefix in invalidation_prefixes(provider, resource, id, *invalidation)? {
            refreshed += client.invalidate(&prefix);
        }
    }
    Ok(refreshed)
}

/// Handle returned by [`use_invalidate`]
#[derive(Clone, PartialEq, Debug)]
pub struct Invalidator {
    context: DataContext,
}

impl Invalidator {
    pub fn invalidate(&self, params: &InvalidateParams) -> Result<usize, ConfigError> {
        invalidate(&self.context, params)
    }
}

/// Invalidate cached queries from a component
pub fn use_invalidate() -> Invalidator {
    let context = use_data_context();
    use_hook(|| Invalidator { context })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segments(keys: Vec<QueryKey>) -> Vec<Vec<String>> {
        keys.into_iter().map(|key| key.segments().to_vec()).collect()
    }

    #[test]
    fn test_list_scope_covers_infinite_lists() {
        let prefixes =
            invalidation_prefixes("default", Some("posts"), None, Invalidation::List).unwrap();
        assert_eq!(
            segments(prefixes),
            vec![
                vec!["data", "default", "posts", "list"],
                vec!["data", "default", "posts", "infinite"],
            ]
        );
    }

    #[test]
    fn test_detail_scope_uses_id() {
        let id = BaseKey::from(7_i64);
        let prefixes =
            invalidation_prefixes("default", Some("posts"), Some(&id), Invalidation::Detail)
                .unwrap();
        assert_eq!(
            segments(prefixes),
            vec![vec!["data", "default", "posts", "one", "7"]]
        );
    }

    #[test]
    fn test_resource_required_below_all() {
        assert!(invalidation_prefixes("default", None, None, Invalidation::All).is_ok());
        assert_eq!(
            invalidation_prefixes("default", None, None, Invalidation::Many),
            Err(ConfigError::MissingResource {
                hook: "use_invalidate"
            })
        );
    }
}
