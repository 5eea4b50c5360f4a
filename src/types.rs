//! Common types and aliases used throughout dioxus-data-hooks

use futures::future::LocalBoxFuture;
use serde::de::DeserializeOwned;

use crate::errors::HttpError;

/// A record as it crosses the data provider boundary.
///
/// Providers speak JSON; hooks decode into the caller's record type.
pub type BaseRecord = serde_json::Value;

/// Free-form metadata forwarded untouched to the data provider.
pub type MetaQuery = serde_json::Map<String, serde_json::Value>;

/// Future returned by every data provider method
pub type ProviderFuture<T> = LocalBoxFuture<'static, Result<T, HttpError>>;

/// Common trait bounds for record types decoded by the hooks
pub trait RecordBounds: DeserializeOwned + Clone + PartialEq + Send + Sync + 'static {}
impl<T> RecordBounds for T where T: DeserializeOwned + Clone + PartialEq + Send + Sync + 'static {}

/// Common trait bounds for values stored in the query cache
pub trait QueryOutputBounds: Clone + PartialEq + Send + Sync + 'static {}
impl<T> QueryOutputBounds for T where T: Clone + PartialEq + Send + Sync + 'static {}
