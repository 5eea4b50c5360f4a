//! # Query Keys
//!
//! Hierarchical cache addresses for queries and mutations.
//!
//! A key is an ordered list of segments:
//!
//! ```text
//! "data" / <provider> / <resource> / <action> / <id> / <params>
//! ```
//!
//! Segments that are not set are dropped rather than padded, so the key of a
//! coarse scope ("everything about `posts`") is a prefix of every finer key in
//! that scope. [`QueryKey::starts_with`] is what bulk invalidation relies on.
//!
//! The parameter bag is serialized to JSON with object keys sorted at every
//! level, so two bags holding the same entries always produce the same segment.
//!
//! ```rust
//! use dioxus_data_hooks::keys::{QueryAction, QueryKeyBuilder};
//! use serde_json::json;
//!
//! let key = QueryKeyBuilder::new()
//!     .data("default")
//!     .resource("posts")
//!     .action(QueryAction::List)
//!     .params(&json!({ "sorters": [], "filters": [] }))
//!     .get();
//!
//! let scope = QueryKeyBuilder::new().data("default").resource("posts").get();
//! assert!(key.starts_with(&scope));
//! ```

use std::fmt;

use serde::Serialize;

/// Root segment shared by every key this crate produces
pub const DATA_SCOPE: &str = "data";

/// What a key addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryAction {
    List,
    One,
    Many,
    Infinite,
    Mutation,
    Custom,
}

impl QueryAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryAction::List => "list",
            QueryAction::One => "one",
            QueryAction::Many => "many",
            QueryAction::Infinite => "infinite",
            QueryAction::Mutation => "mutation",
            QueryAction::Custom => "custom",
        }
    }
}

impl fmt::Display for QueryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A materialized cache address
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether `prefix` addresses a scope containing this key
    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // A JSON array keeps segment boundaries unambiguous
        match serde_json::to_string(&self.0) {
            Ok(rendered) => f.write_str(&rendered),
            Err(_) => write!(f, "{:?}", self.0),
        }
    }
}

/// Fluent builder for [`QueryKey`]
#[derive(Debug, Clone, Default)]
pub struct QueryKeyBuilder {
    provider: Option<String>,
    resource: Option<String>,
    action: Option<QueryAction>,
    mutation: Option<String>,
    id: Option<String>,
    params: Option<String>,
}

impl QueryKeyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider name segment
    pub fn data(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    pub fn resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    pub fn action(mut self, action: QueryAction) -> Self {
        self.action = Some(action);
        self
    }

    /// Mark the key as a mutation key named `name`
    pub fn mutation(mut self, name: impl Into<String>) -> Self {
        self.action = Some(QueryAction::Mutation);
        self.mutation = Some(name.into());
        self
    }

    pub fn id(mut self, id: impl fmt::Display) -> Self {
        self.id = Some(id.to_string());
        self
    }

    /// Parameter bag segment.
    ///
    /// A value that fails to serialize is replaced by its error text, so the
    /// key still differs from the bag-less scope.
    pub fn params<P: Serialize + ?Sized>(mut self, params: &P) -> Self {
        self.params = Some(canonical_json(params));
        self
    }

    /// Materialize the key
    pub fn get(self) -> QueryKey {
        let mut segments = vec![DATA_SCOPE.to_string()];
        segments.extend(self.provider);
        segments.extend(self.resource);
        segments.extend(self.action.map(|action| action.as_str().to_string()));
        segments.extend(self.mutation);
        segments.extend(self.id);
        segments.extend(self.params);
        QueryKey(segments)
    }
}

/// Serialize `value` to JSON with object keys sorted recursively
pub fn canonical_json<P: Serialize + ?Sized>(value: &P) -> String {
    match serde_json::to_value(value) {
        Ok(value) => sort_keys(value).to_string(),
        Err(error) => format!("!unserializable:{error}"),
    }
}

fn sort_keys(value: serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::Object(map) => {
            let mut entries: Vec<_> = map.into_iter().collect();
            entries.sort_by(|(a, _), (b, _)| a.cmp(b));
            serde_json::Value::Object(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, sort_keys(value)))
                    .collect(),
            )
        }
        serde_json::Value::Array(items) => {
            serde_json::Value::Array(items.into_iter().map(sort_keys).collect())
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn list_key(provider: &str, resource: &str, params: serde_json::Value) -> QueryKey {
        QueryKeyBuilder::new()
            .data(provider)
            .resource(resource)
            .action(QueryAction::List)
            .params(&params)
            .get()
    }

    #[test]
    fn test_identical_requests_yield_equal_keys() {
        let a = list_key("default", "posts", json!({ "a": 1, "b": { "x": 1, "y": 2 } }));
        let b = list_key("default", "posts", json!({ "b": { "y": 2, "x": 1 }, "a": 1 }));
        assert_eq!(a, b);
        assert_eq!(a.to_string(), b.to_string());
    }

    #[test]
    fn test_each_component_changes_the_key() {
        let base = QueryKeyBuilder::new()
            .data("default")
            .resource("posts")
            .action(QueryAction::One)
            .id(1)
            .params(&json!({ "lang": "en" }))
            .get();

        let variants = [
            QueryKeyBuilder::new()
                .data("cms")
                .resource("posts")
                .action(QueryAction::One)
                .id(1)
                .params(&json!({ "lang": "en" }))
                .get(),
            QueryKeyBuilder::new()
                .data("default")
                .resource("users")
                .action(QueryAction::One)
                .id(1)
                .params(&json!({ "lang": "en" }))
                .get(),
            QueryKeyBuilder::new()
                .data("default")
                .resource("posts")
                .action(QueryAction::List)
                .id(1)
                .params(&json!({ "lang": "en" }))
                .get(),
            QueryKeyBuilder::new()
                .data("default")
                .resource("posts")
                .action(QueryAction::One)
                .id(2)
                .params(&json!({ "lang": "en" }))
                .get(),
            QueryKeyBuilder::new()
                .data("default")
                .resource("posts")
                .action(QueryAction::One)
                .id(1)
                .params(&json!({ "lang": "de" }))
                .get(),
        ];

        for variant in variants {
            assert_ne!(base, variant);
        }
    }

    #[test]
    fn test_omitted_segments_are_dropped() {
        let key = QueryKeyBuilder::new()
            .data("default")
            .action(QueryAction::Custom)
            .get();
        assert_eq!(key.segments(), ["data", "default", "custom"]);
    }

    #[test]
    fn test_coarse_keys_prefix_fine_keys() {
        let resource = QueryKeyBuilder::new().data("default").resource("posts").get();
        let list = QueryKeyBuilder::new()
            .data("default")
            .resource("posts")
            .action(QueryAction::List)
            .get();
        let fine = list_key("default", "posts", json!({ "filters": [] }));
        let other = list_key("default", "postscripts", json!({ "filters": [] }));

        assert!(fine.starts_with(&list));
        assert!(fine.starts_with(&resource));
        assert!(list.starts_with(&resource));
        assert!(!other.starts_with(&resource));
    }

    #[test]
    fn test_mutation_keys() {
        let key = QueryKeyBuilder::new().data("default").mutation("create").get();
        assert_eq!(key.segments(), ["data", "default", "mutation", "create"]);
    }
}
