//! # Error Types
//!
//! Two families of errors flow through the hooks:
//!
//! - [`ConfigError`]: programming errors such as an unknown data provider or a
//!   mutation fired without its `resource`. They are returned synchronously,
//!   before any provider call, and are never retried.
//! - [`HttpError`]: failures reported by a data provider. They surface through
//!   the hook's state, the notification sink and the error handler.
//!
//! ## Example
//!
//! ```rust
//! use dioxus_data_hooks::errors::{ConfigError, HttpError};
//!
//! let error = HttpError::new("Not Found", 404);
//! assert_eq!(error.to_string(), "Not Found (status code: 404)");
//!
//! let error = ConfigError::MissingResource { hook: "use_create" };
//! assert!(error.to_string().starts_with("[use_create]"));
//! ```

use std::{collections::BTreeMap, rc::Rc};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors raised before a provider is ever invoked
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A provider name was requested that is not registered
    #[error("\"{0}\" Data provider not found")]
    ProviderNotFound(String),

    /// A named provider exists but the registry has no `default` entry
    #[error(
        "If you have multiple data providers, you must provide default data provider property"
    )]
    MissingDefaultProvider,

    /// No provider name was requested and no `default` entry is registered
    #[error("There is no \"default\" data provider. Please pass data_provider_name.")]
    NoDefaultProvider,

    /// A mutation was fired without a resource
    #[error("[{hook}]: `resource` is not defined or not matched but is required")]
    MissingResource { hook: &'static str },

    /// A mutation was fired without values
    #[error("[{hook}]: `values` is not provided but is required")]
    MissingValues { hook: &'static str },

    /// An update was fired without an id
    #[error("[{hook}]: `id` is not defined but is required in edit and clone actions")]
    MissingId { hook: &'static str },

    /// The resolved provider does not implement `custom`
    #[error("Not implemented custom on data provider \"{provider}\".")]
    CustomNotImplemented { provider: String },
}

/// A single field-level validation message returned by a provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ValidationError {
    Message(String),
    Messages(Vec<String>),
    Flag(bool),
    Keyed { key: String, message: String },
}

/// Field name to validation message
pub type ValidationErrors = BTreeMap<String, ValidationError>;

/// Error returned by data provider calls
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{message} (status code: {status_code})")]
#[serde(rename_all = "camelCase")]
pub struct HttpError {
    pub message: String,
    pub status_code: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<ValidationErrors>,
}

impl HttpError {
    /// Create an error with a message and status code
    pub fn new(message: impl Into<String>, status_code: u16) -> Self {
        Self {
            message: message.into(),
            status_code,
            errors: None,
        }
    }

    /// Attach field-level validation errors
    pub fn with_errors(mut self, errors: ValidationErrors) -> Self {
        self.errors = Some(errors);
        self
    }

    /// A provider answered but its records could not be decoded.
    ///
    /// No HTTP status applies, so the status code is 0.
    pub fn decode(error: serde_json::Error) -> Self {
        Self::new(format!("Failed to decode provider response: {error}"), 0)
    }

    /// Submitted values could not be serialized for the provider.
    ///
    /// The request never left the client, so the status code is 0.
    pub fn encode(error: serde_json::Error) -> Self {
        Self::new(format!("Failed to encode request values: {error}"), 0)
    }
}

impl From<serde_json::Error> for HttpError {
    fn from(error: serde_json::Error) -> Self {
        HttpError::decode(error)
    }
}

/// Convenience type alias for Results with HttpError
pub type HttpResult<T> = Result<T, HttpError>;

/// Callback every provider failure is reported to
pub type ErrorHandler = Rc<dyn Fn(&HttpError)>;

/// Handler used when the application does not install one
pub fn default_error_handler() -> ErrorHandler {
    Rc::new(|error: &HttpError| {
        crate::error_log!("❌ [DATA-PROVIDER] {}", error);
    })
}
