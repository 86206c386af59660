//! Error types for the todo API client.
//!
//! # Design
//! `ApiError` is the only failure that carries an HTTP status: every non-2xx
//! response becomes one, with the response text as its message. Everything
//! else (transport failures, malformed JSON) is a `ClientError` variant
//! without a status code. Only the session guard and sign-out flow branch on
//! the status; other call sites display the error text as-is.

use thiserror::Error;

pub type ClientResult<T> = Result<T, ClientError>;

/// A non-2xx HTTP response.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ApiError {
    pub message: String,
    pub status: u16,
}

impl ApiError {
    /// Build from a response status and its body text.
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = if body.is_empty() {
            format!("Request failed: {status}")
        } else {
            body.to_string()
        };
        Self { message, status }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }
}

/// The request never produced an HTTP response.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct TransportError(pub String);

/// Errors surfaced by the request core and the resource clients.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("network error: {0}")]
    Transport(#[from] TransportError),

    #[error("serialization failed: {0}")]
    Serialization(String),

    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// A body was expected but the server answered 204 No Content.
    #[error("expected a response body, got none")]
    MissingBody,
}

impl ClientError {
    /// HTTP status of the failed response, if there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api(err) => Some(err.status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Api(err) if err.is_unauthorized())
    }
}
