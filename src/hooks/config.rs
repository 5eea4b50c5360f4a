//! Hooks exposing pieces of the data context to components.

use std::rc::Rc;

use crate::{
    context::use_data_context,
    errors::{ConfigError, ErrorHandler},
    i18n::Translator,
    notification::{NotificationDispatcher, NotificationProvider},
    registry::ResolvedProvider,
};

/// A resolver picking providers by name, `default` when `None`
pub fn use_data_provider() -> impl Fn(Option<&str>) -> Result<ResolvedProvider, ConfigError> + Clone
{
    let context = use_data_context();
    move |name: Option<&str>| context.resolve(name)
}

/// Base URL of a provider
pub fn use_api_url(data_provider_name: Option<&str>) -> Result<String, ConfigError> {
    let provider = use_data_context().resolve(data_provider_name)?;
    Ok(provider.provider().get_api_url())
}

/// The application's notification sink, if it installed one
pub fn use_notification() -> Option<Rc<dyn NotificationProvider>> {
    use_data_context().notifications().sink().cloned()
}

/// The dispatcher mutations report through
pub fn use_handle_notification() -> NotificationDispatcher {
    use_data_context().notifications().clone()
}

/// The handler every provider failure is reported to
pub fn use_handle_error() -> ErrorHandler {
    use_data_context().error_handler()
}

pub fn use_translate() -> Translator {
    use_data_context().translator().clone()
}

/// Reads the current locale from the i18n provider
pub fn use_get_locale() -> impl Fn() -> Option<String> + Clone {
    let translator = use_translate();
    move || translator.get_locale()
}

/// Switches the i18n provider's locale
pub fn use_set_locale() -> impl Fn(&str) + Clone {
    let translator = use_translate();
    move |locale: &str| translator.change_locale(locale)
}
