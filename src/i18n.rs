//! # Translation
//!
//! The hooks translate their own messages (such as the custom mutation error
//! notification) through an optional [`I18nProvider`]. Without one, or when the
//! provider has no entry for a key, the default message is used, and failing
//! that the key itself.

use std::{fmt, rc::Rc};

/// Application-supplied translation backend
pub trait I18nProvider {
    /// Look up `key`. `options` carries interpolation values.
    fn translate(
        &self,
        key: &str,
        options: Option<&serde_json::Value>,
        default_message: Option<&str>,
    ) -> Option<String>;

    fn change_locale(&self, locale: &str);

    fn get_locale(&self) -> Option<String>;
}

/// Cheap handle over the configured [`I18nProvider`]
#[derive(Clone, Default)]
pub struct Translator {
    provider: Option<Rc<dyn I18nProvider>>,
}

impl Translator {
    pub fn new(provider: Option<Rc<dyn I18nProvider>>) -> Self {
        Self { provider }
    }

    /// Translate `key`, falling back to `default_message` and then to `key`
    pub fn translate(
        &self,
        key: &str,
        options: Option<&serde_json::Value>,
        default_message: Option<&str>,
    ) -> String {
        self.provider
            .as_ref()
            .and_then(|provider| provider.translate(key, options, default_message))
            .or_else(|| default_message.map(str::to_string))
            .unwrap_or_else(|| key.to_string())
    }

    pub fn get_locale(&self) -> Option<String> {
        self.provider.as_ref().and_then(|provider| provider.get_locale())
    }

    pub fn change_locale(&self, locale: &str) {
        match &self.provider {
            Some(provider) => provider.change_locale(locale),
            None => {
                crate::debug_log!("No i18n provider configured, ignoring locale {}", locale);
            }
        }
    }
}

impl PartialEq for Translator {
    fn eq(&self, other: &Self) -> bool {
        match (&self.provider, &other.provider) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl fmt::Debug for Translator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Translator")
            .field("provider", &self.provider.is_some())
            .finish()
    }
}
