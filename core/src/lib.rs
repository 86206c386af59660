//! Async client core for the cookie-authenticated todo service.
//!
//! # Overview
//! A single request core (`RequestCore`) normalizes every HTTP exchange:
//! non-2xx responses become `ApiError { message, status }`, 204 resolves to
//! no value, anything else is parsed as JSON. `AuthClient` and `TodoClient`
//! are thin typed wrappers over it. `SessionGuard` decides per route whether
//! to render, redirect or show an error, and the view models in `pages`
//! drive the screens without depending on any UI framework.
//!
//! # Design
//! - I/O sits behind the `Transport` trait; `UreqTransport` is the shipped
//!   implementation and owns the session cookie jar.
//! - Request building and response parsing are pure, so the whole contract
//!   is testable without a network.
//! - Server data is cached in single-key slots (`me`, `todos`) that are only
//!   ever replaced whole or invalidated; mutations always refetch.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod app;
pub mod auth;
pub mod cache;
pub mod config;
pub mod error;
pub mod guard;
pub mod http;
pub mod pages;
pub mod query;
pub mod request;
pub mod routes;
pub mod todos;
pub mod types;

#[cfg(test)]
mod test_support;

pub use app::{Navigator, Screen, TodoApp};
pub use auth::AuthClient;
pub use cache::{CacheSlot, SessionCache, TodoListCache};
pub use config::ClientConfig;
pub use error::{ApiError, ClientError, ClientResult, TransportError};
pub use guard::{decide, GuardOutcome, Redirect, SessionGuard, CHECKING_MESSAGE};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, UreqTransport};
pub use query::QueryState;
pub use request::{RequestCore, RequestInit};
pub use routes::{Route, RouteKind};
pub use todos::TodoClient;
pub use types::{Credentials, NewTodo, Todo, TodoPatch, TodoStatus, User};
