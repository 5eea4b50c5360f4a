//! State: async state enums for queries and mutations
//!
//! [`QueryState`] is what query hooks (`use_list`, `use_one`, ...) expose and
//! [`MutationState`] is what mutation handles expose. Both implement
//! [`AsyncState`] so components can render either the same way.

use dioxus::core::Task;

use crate::errors::HttpError;

/// Common trait for async state types that represent loading, success, and error states
pub trait AsyncState {
    /// The type of successful data
    type Data;
    /// The type of error
    type Error;

    /// Returns true if the state is currently loading
    fn is_loading(&self) -> bool;

    /// Returns true if the state contains successful data
    fn is_success(&self) -> bool;

    /// Returns true if the state contains an error
    fn is_error(&self) -> bool;

    /// Returns the data if successful, None otherwise
    fn data(&self) -> Option<&Self::Data>;

    /// Returns the error if failed, None otherwise
    fn error(&self) -> Option<&Self::Error>;
}

/// State of a query
#[derive(Clone, PartialEq, Debug)]
pub enum QueryState<T, E = HttpError> {
    /// The query is disabled and has not fetched
    Idle,
    /// The provider call is in flight
    Loading { task: Task },
    Success(T),
    Error(E),
}

impl<T, E> AsyncState for QueryState<T, E> {
    type Data = T;
    type Error = E;

    fn is_loading(&self) -> bool {
        matches!(self, QueryState::Loading { .. })
    }

    fn is_success(&self) -> bool {
        matches!(self, QueryState::Success(_))
    }

    fn is_error(&self) -> bool {
        matches!(self, QueryState::Error(_))
    }

    fn data(&self) -> Option<&T> {
        match self {
            QueryState::Success(data) => Some(data),
            _ => None,
        }
    }

    fn error(&self) -> Option<&E> {
        match self {
            QueryState::Error(error) => Some(error),
            _ => None,
        }
    }
}

impl<T, E> QueryState<T, E> {
    pub fn is_idle(&self) -> bool {
        matches!(self, QueryState::Idle)
    }

    /// Returns true if the state is currently loading
    pub fn is_loading(&self) -> bool {
        <Self as AsyncState>::is_loading(self)
    }

    /// Returns true if the state contains successful data
    pub fn is_success(&self) -> bool {
        <Self as AsyncState>::is_success(self)
    }

    /// Returns true if the state contains an error
    pub fn is_error(&self) -> bool {
        <Self as AsyncState>::is_error(self)
    }

    /// Returns the data if successful, None otherwise
    pub fn data(&self) -> Option<&T> {
        <Self as AsyncState>::data(self)
    }

    /// Returns the error if failed, None otherwise
    pub fn error(&self) -> Option<&E> {
        <Self as AsyncState>::error(self)
    }

    /// Maps a QueryState<T, E> to QueryState<U, E> by applying a function to the contained data if successful.
    pub fn map<U, F>(self, op: F) -> QueryState<U, E>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            QueryState::Success(data) => QueryState::Success(op(data)),
            QueryState::Error(e) => QueryState::Error(e),
            QueryState::Loading { task } => QueryState::Loading { task },
            QueryState::Idle => QueryState::Idle,
        }
    }

    /// Maps a QueryState<T, E> to QueryState<T, F> by applying a function to the contained error if failed.
    pub fn map_err<F, O>(self, op: O) -> QueryState<T, F>
    where
        O: FnOnce(E) -> F,
    {
        match self {
            QueryState::Success(data) => QueryState::Success(data),
            QueryState::Error(e) => QueryState::Error(op(e)),
            QueryState::Loading { task } => QueryState::Loading { task },
            QueryState::Idle => QueryState::Idle,
        }
    }

    pub(crate) fn from_result(result: Result<T, E>) -> Self {
        match result {
            Ok(data) => QueryState::Success(data),
            Err(error) => QueryState::Error(error),
        }
    }
}

/// State of a mutation
#[derive(Clone, PartialEq, Debug)]
pub enum MutationState<T, E = HttpError> {
    /// Nothing has been submitted yet
    Idle,
    Loading,
    Success(T),
    Error(E),
}

impl<T, E> AsyncState for MutationState<T, E> {
    type Data = T;
    type Error = E;

    fn is_loading(&self) -> bool {
        matches!(self, MutationState::Loading)
    }

    fn is_success(&self) -> bool {
        matches!(self, MutationState::Success(_))
    }

    fn is_error(&self) -> bool {
        matches!(self, MutationState::Error(_))
    }

    fn data(&self) -> Option<&T> {
        match self {
            MutationState::Success(data) => Some(data),
            _ => None,
        }
    }

    fn error(&self) -> Option<&E> {
        match self {
            MutationState::Error(error) => Some(error),
            _ => None,
        }
    }
}

impl<T, E> MutationState<T, E> {
    /// Returns true if the mutation is idle
    pub fn is_idle(&self) -> bool {
        matches!(self, MutationState::Idle)
    }

    pub fn is_loading(&self) -> bool {
        <Self as AsyncState>::is_loading(self)
    }

    pub fn is_success(&self) -> bool {
        <Self as AsyncState>::is_success(self)
    }

    pub fn is_error(&self) -> bool {
        <Self as AsyncState>::is_error(self)
    }

    pub fn data(&self) -> Option<&T> {
        <Self as AsyncState>::data(self)
    }

    pub fn error(&self) -> Option<&E> {
        <Self as AsyncState>::error(self)
    }

    pub(crate) fn from_result(result: Result<T, E>) -> Self {
        match result {
            Ok(data) => MutationState::Success(data),
            Err(error) => MutationState::Error(error),
        }
    }
}
