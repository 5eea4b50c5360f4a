//! # Notifications
//!
//! Every mutation outcome passes through the [`NotificationDispatcher`], which
//! decides what (if anything) reaches the application's
//! [`NotificationProvider`].
//!
//! The decision combines a caller's [`NotificationRequest`] with the hook's
//! built-in fallback message:
//!
//! | request               | fallback   | delivered        |
//! |-----------------------|------------|------------------|
//! | `Suppress`            | any        | nothing          |
//! | `Open(params)`        | any        | `params`         |
//! | `Inherit`             | `Some(f)`  | `f`              |
//! | `Inherit`             | `None`     | nothing          |

use std::{fmt, rc::Rc};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    Progress,
}

/// A notification ready to be shown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenNotificationParams {
    /// Notifications sharing a key replace each other
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    /// Seconds an undoable notification stays open
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub undoable_timeout: Option<u32>,
}

impl OpenNotificationParams {
    pub fn new(kind: NotificationKind, message: impl Into<String>) -> Self {
        Self {
            key: None,
            message: message.into(),
            description: None,
            kind,
            undoable_timeout: None,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Success, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Error, message)
    }

    pub fn progress(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Progress, message)
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_undoable_timeout(mut self, seconds: u32) -> Self {
        self.undoable_timeout = Some(seconds);
        self
    }
}

/// What a caller asks for on a particular outcome
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum NotificationRequest {
    /// No preference; use the hook's fallback
    #[default]
    Inherit,
    /// Show nothing, even if a fallback exists
    Suppress,
    /// Show exactly this
    Open(OpenNotificationParams),
}

impl From<OpenNotificationParams> for NotificationRequest {
    fn from(params: OpenNotificationParams) -> Self {
        NotificationRequest::Open(params)
    }
}

/// Decide which notification, if any, should be delivered
pub fn resolve_notification(
    request: NotificationRequest,
    fallback: Option<OpenNotificationParams>,
) -> Option<OpenNotificationParams> {
    match request {
        NotificationRequest::Suppress => None,
        NotificationRequest::Open(params) => Some(params),
        NotificationRequest::Inherit => fallback,
    }
}

/// Application-supplied notification sink
pub trait NotificationProvider {
    fn open(&self, params: OpenNotificationParams);

    fn close(&self, key: &str);
}

/// Routes resolved notifications to the configured sink
#[derive(Clone, Default)]
pub struct NotificationDispatcher {
    sink: Option<Rc<dyn NotificationProvider>>,
}

impl NotificationDispatcher {
    pub fn new(sink: Option<Rc<dyn NotificationProvider>>) -> Self {
        Self { sink }
    }

    /// Resolve `request` against `fallback` and deliver the result.
    ///
    /// Returns what was delivered. Without a sink the notification is only
    /// logged.
    pub fn dispatch(
        &self,
        request: NotificationRequest,
        fallback: Option<OpenNotificationParams>,
    ) -> Option<OpenNotificationParams> {
        let params = resolve_notification(request, fallback)?;
        crate::log_notification!(
            "{:?} {}: {}",
            params.kind,
            params.key.as_deref().unwrap_or("-"),
            params.message
        );
        if let Some(sink) = &self.sink {
            sink.open(params.clone());
        }
        Some(params)
    }

    pub fn close(&self, key: &str) {
        if let Some(sink) = &self.sink {
            sink.close(key);
        }
    }

    pub fn sink(&self) -> Option<&Rc<dyn NotificationProvider>> {
        self.sink.as_ref()
    }
}

impl PartialEq for NotificationDispatcher {
    fn eq(&self, other: &Self) -> bool {
        match (&self.sink, &other.sink) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl fmt::Debug for NotificationDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationDispatcher")
            .field("sink", &self.sink.is_some())
            .finish()
    }
}

/// Callback computing a notification from an outcome, the submitted values and
/// the resource name
pub type NotificationFn<D, V> = Rc<dyn Fn(&D, &V, &str) -> NotificationRequest>;

/// Per-hook notification setting for one outcome (success or error)
pub enum NotificationProp<D, V> {
    Inherit,
    Suppress,
    Open(OpenNotificationParams),
    With(NotificationFn<D, V>),
}

impl<D, V> NotificationProp<D, V> {
    /// Compute the notification from the outcome
    pub fn with(callback: impl Fn(&D, &V, &str) -> NotificationRequest + 'static) -> Self {
        NotificationProp::With(Rc::new(callback))
    }

    pub fn is_inherit(&self) -> bool {
        matches!(self, NotificationProp::Inherit)
    }

    /// This prop unless it is `Inherit`, otherwise `fallback`
    pub fn or(self, fallback: Self) -> Self {
        if self.is_inherit() { fallback } else { self }
    }

    /// Turn the prop into a request for a concrete outcome
    pub fn request(&self, outcome: &D, values: &V, resource: &str) -> NotificationRequest {
        match self {
            NotificationProp::Inherit => NotificationRequest::Inherit,
            NotificationProp::Suppress => NotificationRequest::Suppress,
            NotificationProp::Open(params) => NotificationRequest::Open(params.clone()),
            NotificationProp::With(callback) => callback(outcome, values, resource),
        }
    }
}

impl<D, V> Default for NotificationProp<D, V> {
    fn default() -> Self {
        NotificationProp::Inherit
    }
}

impl<D, V> Clone for NotificationProp<D, V> {
    fn clone(&self) -> Self {
        match self {
            NotificationProp::Inherit => NotificationProp::Inherit,
            NotificationProp::Suppress => NotificationProp::Suppress,
            NotificationProp::Open(params) => NotificationProp::Open(params.clone()),
            NotificationProp::With(callback) => NotificationProp::With(callback.clone()),
        }
    }
}

impl<D, V> PartialEq for NotificationProp<D, V> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (NotificationProp::Inherit, NotificationProp::Inherit) => true,
            (NotificationProp::Suppress, NotificationProp::Suppress) => true,
            (NotificationProp::Open(a), NotificationProp::Open(b)) => a == b,
            (NotificationProp::With(a), NotificationProp::With(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl<D, V> fmt::Debug for NotificationProp<D, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotificationProp::Inherit => f.write_str("Inherit"),
            NotificationProp::Suppress => f.write_str("Suppress"),
            NotificationProp::Open(params) => f.debug_tuple("Open").field(params).finish(),
            NotificationProp::With(_) => f.write_str("With(..)"),
        }
    }
}

impl<D, V> From<OpenNotificationParams> for NotificationProp<D, V> {
    fn from(params: OpenNotificationParams) -> Self {
        NotificationProp::Open(params)
    }
}
