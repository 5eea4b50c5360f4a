//! # Data Provider Registry
//!
//! Maps provider names to [`DataProviderEntry`] values. The registry is built
//! once, handed to [`DataConfig`](crate::context::DataConfig) and is read-only
//! from then on; there is no API to add or remove providers after mount.
//!
//! Name resolution follows these rules:
//!
//! | requested name | registered                      | result                          |
//! |----------------|---------------------------------|---------------------------------|
//! | `Some(n)`      | `n` missing                     | [`ConfigError::ProviderNotFound`] |
//! | `Some(n)`      | `n` present, `default` missing  | [`ConfigError::MissingDefaultProvider`] |
//! | `Some(n)`      | `n` and `default` present       | provider `n`                    |
//! | `None`         | `default` present               | provider `default`              |
//! | `None`         | `default` missing               | [`ConfigError::NoDefaultProvider`] |

use std::{collections::BTreeMap, fmt, rc::Rc};

use crate::{
    data_provider::{CustomRequests, DataProvider, ManyRecords},
    errors::ConfigError,
};

/// Name of the provider used when a hook does not ask for one
pub const DEFAULT_PROVIDER: &str = "default";

/// A registered provider together with the optional capabilities it supports
#[derive(Clone)]
pub struct DataProviderEntry {
    core: Rc<dyn DataProvider>,
    many: Option<Rc<dyn ManyRecords>>,
    custom: Option<Rc<dyn CustomRequests>>,
}

impl DataProviderEntry {
    /// Register a provider with only the mandatory operations
    pub fn new<P: DataProvider + 'static>(provider: P) -> Self {
        Self {
            core: Rc::new(provider),
            many: None,
            custom: None,
        }
    }

    /// Register a provider that implements every capability
    pub fn full<P>(provider: P) -> Self
    where
        P: DataProvider + ManyRecords + CustomRequests + 'static,
    {
        let provider = Rc::new(provider);
        Self {
            core: provider.clone(),
            many: Some(provider.clone()),
            custom: Some(provider),
        }
    }

    /// Attach bulk operations
    pub fn with_many_records<M: ManyRecords + 'static>(mut self, many: M) -> Self {
        self.many = Some(Rc::new(many));
        self
    }

    /// Attach custom requests
    pub fn with_custom_requests<C: CustomRequests + 'static>(mut self, custom: C) -> Self {
        self.custom = Some(Rc::new(custom));
        self
    }

    pub fn provider(&self) -> &Rc<dyn DataProvider> {
        &self.core
    }

    pub fn many(&self) -> Option<&Rc<dyn ManyRecords>> {
        self.many.as_ref()
    }

    pub fn custom(&self) -> Option<&Rc<dyn CustomRequests>> {
        self.custom.as_ref()
    }
}

impl PartialEq for DataProviderEntry {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.core, &other.core)
            && option_ptr_eq(&self.many, &other.many)
            && option_ptr_eq(&self.custom, &other.custom)
    }
}

fn option_ptr_eq<T: ?Sized>(a: &Option<Rc<T>>, b: &Option<Rc<T>>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => Rc::ptr_eq(a, b),
        (None, None) => true,
        _ => false,
    }
}

impl fmt::Debug for DataProviderEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataProviderEntry")
            .field("many", &self.many.is_some())
            .field("custom", &self.custom.is_some())
            .finish_non_exhaustive()
    }
}

/// The outcome of a registry lookup
#[derive(Clone, PartialEq, Debug)]
pub struct ResolvedProvider {
    name: String,
    entry: DataProviderEntry,
}

impl ResolvedProvider {
    /// Name the provider was picked by, `"default"` when none was requested
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn provider(&self) -> &Rc<dyn DataProvider> {
        self.entry.provider()
    }

    pub fn many(&self) -> Option<&Rc<dyn ManyRecords>> {
        self.entry.many()
    }

    /// Custom request capability, or an error naming this provider
    pub fn custom(&self) -> Result<&Rc<dyn CustomRequests>, ConfigError> {
        self.entry
            .custom()
            .ok_or_else(|| ConfigError::CustomNotImplemented {
                provider: self.name.clone(),
            })
    }
}

/// Immutable name → provider map
#[derive(Clone, Default)]
pub struct DataProviders {
    entries: Rc<BTreeMap<String, DataProviderEntry>>,
}

impl DataProviders {
    /// Start an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the `default` provider
    pub fn with_default(self, entry: DataProviderEntry) -> Self {
        self.with(DEFAULT_PROVIDER, entry)
    }

    /// Register a provider under `name`
    pub fn with(mut self, name: impl Into<String>, entry: DataProviderEntry) -> Self {
        Rc::make_mut(&mut self.entries).insert(name.into(), entry);
        self
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pick the provider a hook should use
    pub fn resolve(&self, name: Option<&str>) -> Result<ResolvedProvider, ConfigError> {
        match name {
            Some(name) => {
                let entry = self
                    .entries
                    .get(name)
                    .ok_or_else(|| ConfigError::ProviderNotFound(name.to_string()))?;
                if !self.entries.contains_key(DEFAULT_PROVIDER) {
                    return Err(ConfigError::MissingDefaultProvider);
                }
                Ok(ResolvedProvider {
                    name: name.to_string(),
                    entry: entry.clone(),
                })
            }
            None => self
                .entries
                .get(DEFAULT_PROVIDER)
                .map(|entry| ResolvedProvider {
                    name: DEFAULT_PROVIDER.to_string(),
                    entry: entry.clone(),
                })
                .ok_or(ConfigError::NoDefaultProvider),
        }
    }
}

impl From<DataProviderEntry> for DataProviders {
    fn from(entry: DataProviderEntry) -> Self {
        DataProviders::new().with_default(entry)
    }
}

impl PartialEq for DataProviders {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.entries, &other.entries)
    }
}

impl fmt::Debug for DataProviders {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{crud::*, types::ProviderFuture};
    use futures::FutureExt;
    use serde_json::json;

    struct Named(&'static str);

    impl DataProvider for Named {
        fn get_list(&self, _params: GetListParams) -> ProviderFuture<GetListResponse> {
            async { Ok(GetListResponse::new(Vec::new(), 0)) }.boxed_local()
        }

        fn get_one(&self, params: GetOneParams) -> ProviderFuture<GetOneResponse> {
            async move { Ok(RecordResponse { data: json!({ "id": params.id }) }) }.boxed_local()
        }

        fn create(&self, params: CreateParams) -> ProviderFuture<CreateResponse> {
            async move { Ok(RecordResponse { data: params.variables }) }.boxed_local()
        }

        fn update(&self, params: UpdateParams) -> ProviderFuture<UpdateResponse> {
            async move { Ok(RecordResponse { data: params.variables }) }.boxed_local()
        }

        fn delete_one(&self, params: DeleteOneParams) -> ProviderFuture<DeleteOneResponse> {
            async move { Ok(RecordResponse { data: json!({ "id": params.id }) }) }.boxed_local()
        }

        fn get_api_url(&self) -> String {
            format!("https://{}.example.com", self.0)
        }
    }

    impl CustomRequests for Named {
        fn custom(&self, params: CustomParams) -> ProviderFuture<CustomResponse> {
            async move { Ok(RecordResponse { data: json!({ "url": params.url }) }) }.boxed_local()
        }
    }

    #[test]
    fn test_default_is_picked_without_a_name() {
        let providers = DataProviders::from(DataProviderEntry::new(Named("api")));
        let resolved = providers.resolve(None).unwrap();
        assert_eq!(resolved.name(), "default");
        assert_eq!(resolved.provider().get_api_url(), "https://api.example.com");
    }

    #[test]
    fn test_named_provider_requires_default() {
        let providers = DataProviders::new()
            .with_default(DataProviderEntry::new(Named("api")))
            .with("cms", DataProviderEntry::new(Named("cms")));
        let resolved = providers.resolve(Some("cms")).unwrap();
        assert_eq!(resolved.name(), "cms");
        assert_eq!(resolved.provider().get_api_url(), "https://cms.example.com");

        let without_default = DataProviders::new().with("cms", DataProviderEntry::new(Named("cms")));
        assert_eq!(
            without_default.resolve(Some("cms")),
            Err(ConfigError::MissingDefaultProvider)
        );
        assert_eq!(
            without_default.resolve(None),
            Err(ConfigError::NoDefaultProvider)
        );
    }

    #[test]
    fn test_unknown_provider() {
        let providers = DataProviders::from(DataProviderEntry::new(Named("api")));
        let error = providers.resolve(Some("billing")).unwrap_err();
        assert_eq!(error, ConfigError::ProviderNotFound("billing".to_string()));
        assert_eq!(error.to_string(), "\"billing\" Data provider not found");
    }

    #[test]
    fn test_optional_capabilities() {
        let plain = DataProviders::from(DataProviderEntry::new(Named("api")))
            .resolve(None)
            .unwrap();
        assert!(plain.many().is_none());
        assert_eq!(
            plain.custom().err(),
            Some(ConfigError::CustomNotImplemented {
                provider: "default".to_string()
            })
        );

        let custom = DataProviders::from(
            DataProviderEntry::new(Named("api")).with_custom_requests(Named("api")),
        )
        .resolve(None)
        .unwrap();
        assert!(custom.custom().is_ok());
    }

    #[test]
    fn test_entries_compare_by_identity() {
        let entry = DataProviderEntry::new(Named("api"));
        assert_eq!(entry, entry.clone());
        assert_ne!(entry, DataProviderEntry::new(Named("api")));
    }
}
