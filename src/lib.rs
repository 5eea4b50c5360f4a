#![doc = include_str!("../README.md")]

// Core modules
pub mod cache;
pub mod context;
pub mod crud;
pub mod data_provider;
pub mod errors;
pub mod hooks;
pub mod i18n;
pub mod keys;
mod log_utils;
pub mod notification;
pub mod pagination;
pub mod platform;
pub mod refresh;
pub mod registry;
pub mod runtime;
pub mod state;
pub mod types;

// Re-export commonly used items at crate root for convenience
pub use context::{DataConfig, DataContext, use_init_data};

pub mod prelude {
    //! The prelude exports all the most common types and functions for using dioxus-data-hooks.

    // Root configuration
    pub use crate::context::{DataConfig, DataContext, use_data_context, use_init_data};
    pub use crate::registry::{DEFAULT_PROVIDER, DataProviderEntry, DataProviders, ResolvedProvider};
    pub use crate::runtime::QueryClientConfig;

    // The provider contract
    pub use crate::crud::*;
    pub use crate::data_provider::{CustomRequests, DataProvider, ManyRecords};
    pub use crate::types::{BaseRecord, MetaQuery, ProviderFuture};

    // Query hooks
    pub use crate::hooks::{
        CustomConfig, InfiniteData, QueryOptions, UseCustomProps, UseInfiniteList, UseListProps,
        UseManyProps, UseOneProps, use_custom, use_infinite_list, use_list, use_many, use_one,
    };

    // Mutation hooks
    pub use crate::hooks::{
        UseCreate, UseCreateParams, UseCustomMutation, UseCustomMutationParams, UseUpdate,
        UseUpdateParams, use_create, use_custom_mutation, use_update,
    };

    // Cache invalidation
    pub use crate::hooks::{InvalidateParams, Invalidation, Invalidator, use_invalidate};

    // Context accessors
    pub use crate::hooks::{
        use_api_url, use_data_provider, use_get_locale, use_handle_error,
        use_handle_notification, use_notification, use_set_locale, use_translate,
    };

    // Pagination
    pub use crate::pagination::{Cursor, PageParam, Pagination, PaginationMode};

    // The async state enums, needed for matching
    pub use crate::state::{AsyncState, MutationState, QueryState};

    // Notifications and translation
    pub use crate::i18n::{I18nProvider, Translator};
    pub use crate::notification::{
        NotificationKind, NotificationProp, NotificationProvider, NotificationRequest,
        OpenNotificationParams,
    };

    // Error types
    pub use crate::errors::{ConfigError, ErrorHandler, HttpError, HttpResult};
}
