//! # Data Context
//!
//! The root of an application installs one [`DataContext`] with
//! [`use_init_data`]; every hook below it reads it with [`use_data_context`].
//! The context is immutable after mount: the provider registry, the
//! notification sink, the error handler and the translator are fixed, and only
//! the query client's cache changes over time.
//!
//! ## Example
//!
//! ```rust,no_run
//! use dioxus::prelude::*;
//! use dioxus_data_hooks::prelude::*;
//! # fn my_provider() -> DataProviderEntry { unimplemented!() }
//!
//! #[component]
//! fn App() -> Element {
//!     use_init_data(|| DataConfig::new(my_provider()));
//!     rsx! { Posts {} }
//! }
//!
//! #[component]
//! fn Posts() -> Element {
//!     let posts = use_list::<serde_json::Value>(UseListProps::new("posts"))?;
//!     rsx! { "{posts:?}" }
//! }
//! ```

use std::{fmt, rc::Rc};

use dioxus::prelude::*;

use crate::{
    errors::{ConfigError, ErrorHandler, HttpError, default_error_handler},
    i18n::{I18nProvider, Translator},
    notification::{NotificationDispatcher, NotificationProvider},
    registry::{DataProviders, ResolvedProvider},
    runtime::{QueryClient, QueryClientConfig, cache_mgmt::setup_cache_maintenance},
};

/// Everything the root hands to [`use_init_data`]
#[derive(Clone)]
pub struct DataConfig {
    providers: DataProviders,
    notification: Option<Rc<dyn NotificationProvider>>,
    error_handler: Option<ErrorHandler>,
    i18n: Option<Rc<dyn I18nProvider>>,
    query_client: QueryClientConfig,
}

impl DataConfig {
    /// Configure with a registry, or a single provider used as `default`
    pub fn new(providers: impl Into<DataProviders>) -> Self {
        Self {
            providers: providers.into(),
            notification: None,
            error_handler: None,
            i18n: None,
            query_client: QueryClientConfig::default(),
        }
    }

    pub fn with_notification<N: NotificationProvider + 'static>(mut self, sink: N) -> Self {
        self.notification = Some(Rc::new(sink));
        self
    }

    /// Replace the handler every provider failure is reported to
    pub fn with_error_handler(mut self, handler: impl Fn(&HttpError) + 'static) -> Self {
        self.error_handler = Some(Rc::new(handler));
        self
    }

    pub fn with_i18n<I: I18nProvider + 'static>(mut self, i18n: I) -> Self {
        self.i18n = Some(Rc::new(i18n));
        self
    }

    pub fn with_query_client(mut self, config: QueryClientConfig) -> Self {
        self.query_client = config;
        self
    }

    /// Build the context without mounting it
    pub fn build(self) -> DataContext {
        DataContext {
            inner: Rc::new(DataContextInner {
                providers: self.providers,
                notifications: NotificationDispatcher::new(self.notification),
                error_handler: self.error_handler.unwrap_or_else(default_error_handler),
                translator: Translator::new(self.i18n),
                client: QueryClient::new(self.query_client),
            }),
        }
    }
}

struct DataContextInner {
    providers: DataProviders,
    notifications: NotificationDispatcher,
    error_handler: ErrorHandler,
    translator: Translator,
    client: QueryClient,
}

/// Shared configuration every data hook reads
#[derive(Clone)]
pub struct DataContext {
    inner: Rc<DataContextInner>,
}

impl DataContext {
    pub fn providers(&self) -> &DataProviders {
        &self.inner.providers
    }

    /// Pick a provider by name, `default` when `None`
    pub fn resolve(&self, name: Option<&str>) -> Result<ResolvedProvider, ConfigError> {
        self.inner.providers.resolve(name)
    }

    pub fn notifications(&self) -> &NotificationDispatcher {
        &self.inner.notifications
    }

    pub fn translator(&self) -> &Translator {
        &self.inner.translator
    }

    pub fn client(&self) -> &QueryClient {
        &self.inner.client
    }

    pub fn error_handler(&self) -> ErrorHandler {
        self.inner.error_handler.clone()
    }

    /// Report a provider failure
    pub fn handle_error(&self, error: &HttpError) {
        (self.inner.error_handler)(error);
    }
}

impl PartialEq for DataContext {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for DataContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataContext")
            .field("providers", &self.inner.providers)
            .field("notifications", &self.inner.notifications)
            .field("translator", &self.inner.translator)
            .finish_non_exhaustive()
    }
}

/// Install the data context for this component and its children.
///
/// `init` runs once; later renders reuse the first context. Cache garbage
/// collection starts here.
pub fn use_init_data(init: impl FnOnce() -> DataConfig) -> DataContext {
    use_context_provider(move || {
        let context = init().build();
        setup_cache_maintenance(context.client());
        crate::debug_log!(
            "🚀 [DATA] Context mounted with providers: {:?}",
            context.providers().names().collect::<Vec<_>>()
        );
        context
    })
}

/// Read the data context installed by an ancestor.
///
/// # Panics
///
/// Panics when no ancestor called [`use_init_data`].
pub fn use_data_context() -> DataContext {
    try_use_context::<DataContext>().unwrap_or_else(|| {
        panic!("No data context found. Call use_init_data() in a parent component.")
    })
}
