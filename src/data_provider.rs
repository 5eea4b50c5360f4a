//! # Data Provider Contract
//!
//! A data provider is the application's adapter between the hooks and a
//! backend. Every method takes a parameter struct from [`crate::crud`] and
//! returns a [`ProviderFuture`] that resolves to the response or an
//! [`HttpError`](crate::errors::HttpError).
//!
//! The contract is split by capability:
//!
//! - [`DataProvider`]: mandatory single-record and list operations.
//! - [`ManyRecords`]: optional bulk operations.
//! - [`CustomRequests`]: optional arbitrary requests.
//!
//! Optional capabilities are registered explicitly on a
//! [`DataProviderEntry`](crate::registry::DataProviderEntry), so a hook can
//! tell whether a provider supports them before calling anything.
//!
//! ## Example
//!
//! ```rust
//! use dioxus_data_hooks::prelude::*;
//! use futures::FutureExt;
//! use serde_json::json;
//!
//! struct StaticPosts;
//!
//! impl DataProvider for StaticPosts {
//!     fn get_list(&self, _params: GetListParams) -> ProviderFuture<GetListResponse> {
//!         async { Ok(GetListResponse::new(vec![json!({ "id": 1 })], 1)) }.boxed_local()
//!     }
//!
//!     fn get_one(&self, params: GetOneParams) -> ProviderFuture<GetOneResponse> {
//!         async move { Ok(RecordResponse { data: json!({ "id": params.id }) }) }.boxed_local()
//!     }
//!
//!     fn create(&self, params: CreateParams) -> ProviderFuture<CreateResponse> {
//!         async move { Ok(RecordResponse { data: params.variables }) }.boxed_local()
//!     }
//!
//!     fn update(&self, params: UpdateParams) -> ProviderFuture<UpdateResponse> {
//!         async move { Ok(RecordResponse { data: params.variables }) }.boxed_local()
//!     }
//!
//!     fn delete_one(&self, params: DeleteOneParams) -> ProviderFuture<DeleteOneResponse> {
//!         async move { Ok(RecordResponse { data: json!({ "id": params.id }) }) }.boxed_local()
//!     }
//!
//!     fn get_api_url(&self) -> String {
//!         "memory://posts".to_string()
//!     }
//! }
//! ```

use crate::{
    crud::{
        CreateManyParams, CreateManyResponse, CreateParams, CreateResponse, CustomParams,
        CustomResponse, DeleteManyParams, DeleteManyResponse, DeleteOneParams, DeleteOneResponse,
        GetListParams, GetListResponse, GetManyParams, GetManyResponse, GetOneParams,
        GetOneResponse, UpdateManyParams, UpdateManyResponse, UpdateParams, UpdateResponse,
    },
    types::ProviderFuture,
};

/// Mandatory operations every data provider implements
pub trait DataProvider {
    /// Fetch a page of records
    fn get_list(&self, params: GetListParams) -> ProviderFuture<GetListResponse>;

    /// Fetch a single record by id
    fn get_one(&self, params: GetOneParams) -> ProviderFuture<GetOneResponse>;

    fn create(&self, params: CreateParams) -> ProviderFuture<CreateResponse>;

    fn update(&self, params: UpdateParams) -> ProviderFuture<UpdateResponse>;

    fn delete_one(&self, params: DeleteOneParams) -> ProviderFuture<DeleteOneResponse>;

    /// Base URL the provider talks to
    fn get_api_url(&self) -> String;
}

/// Bulk record operations
pub trait ManyRecords {
    fn get_many(&self, params: GetManyParams) -> ProviderFuture<GetManyResponse>;

    fn create_many(&self, params: CreateManyParams) -> ProviderFuture<CreateManyResponse>;

    fn update_many(&self, params: UpdateManyParams) -> ProviderFuture<UpdateManyResponse>;

    fn delete_many(&self, params: DeleteManyParams) -> ProviderFuture<DeleteManyResponse>;
}

/// Arbitrary requests outside the CRUD shape
pub trait CustomRequests {
    fn custom(&self, params: CustomParams) -> ProviderFuture<CustomResponse>;
}
