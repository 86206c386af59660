//! Per-operation async state consumed by the rendering layer.

use crate::error::ClientError;

/// Where one fetch or mutation stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryState<T> {
    Idle,
    Pending,
    Succeeded(T),
    Failed(ClientError),
}

impl<T> Default for QueryState<T> {
    fn default() -> Self {
        QueryState::Idle
    }
}

impl<T> QueryState<T> {
    pub fn is_pending(&self) -> bool {
        matches!(self, QueryState::Pending)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            QueryState::Succeeded(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ClientError> {
        match self {
            QueryState::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// Text a view shows for a failure, exactly as the error displays.
    pub fn error_message(&self) -> Option<String> {
        self.error().map(ToString::to_string)
    }
}

impl<T> From<Result<T, ClientError>> for QueryState<T> {
    fn from(result: Result<T, ClientError>) -> Self {
        match result {
            Ok(value) => QueryState::Succeeded(value),
            Err(err) => QueryState::Failed(err),
        }
    }
}
