//! Data hooks for Dioxus components

// Internal helper modules
mod mutation;
mod query;

mod config;
mod create;
mod custom;
mod custom_mutation;
mod infinite;
mod invalidate;
mod list;
mod many;
mod one;
mod update;

pub use config::{
    use_api_url, use_data_provider, use_get_locale, use_handle_error, use_handle_notification,
    use_notification, use_set_locale, use_translate,
};
pub use create::{DEFAULT_CREATE_INVALIDATES, UseCreate, UseCreateParams, create, use_create};
pub use custom::{CustomConfig, UseCustomProps, use_custom};
pub use custom_mutation::{
    UseCustomMutation, UseCustomMutationParams, custom_mutation, use_custom_mutation,
};
pub use infinite::{InfiniteData, PageDirection, UseInfiniteList, use_infinite_list};
pub use invalidate::{
    InvalidateParams, Invalidation, Invalidator, invalidate, invalidation_prefixes,
    use_invalidate,
};
pub use list::{UseListProps, use_list};
pub use many::{UseManyProps, use_many};
pub use one::{UseOneProps, use_one};
pub use query::QueryOptions;
pub use update::{DEFAULT_UPDATE_INVALIDATES, UseUpdate, UseUpdateParams, update, use_update};
