//! Route-level session guard.
//!
//! # Design
//! `decide` is a pure function from the session check's state and the kind
//! of route to what should be shown. `SessionGuard` produces that state: it
//! answers from the session cache when an identity is cached and otherwise
//! asks the server via `me()`. A 401 is the only failure that redirects;
//! every other failure is rendered so it is not mistaken for "signed out".

use tracing::{debug, info};

use crate::auth::AuthClient;
use crate::cache::SessionCache;
use crate::query::QueryState;
use crate::routes::{Route, RouteKind};
use crate::types::User;

pub const CHECKING_MESSAGE: &str = "Checking session...";

/// A navigation the guard asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Redirect {
    pub to: Route,
    /// Replace the current history entry so "back" does not return here.
    pub replace: bool,
}

impl Redirect {
    pub fn replace(to: Route) -> Self {
        Self { to, replace: true }
    }
}

/// What a guarded route renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    /// The session check is still in flight.
    Checking,
    /// Render the route's own content.
    Render,
    Redirect(Redirect),
    /// Render this message instead of the content.
    Error(String),
}

impl GuardOutcome {
    /// Text shown in place of the route's content, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            GuardOutcome::Checking => Some(CHECKING_MESSAGE),
            GuardOutcome::Error(message) => Some(message.as_str()),
            GuardOutcome::Render | GuardOutcome::Redirect(_) => None,
        }
    }
}

pub fn decide(kind: RouteKind, session: &QueryState<User>) -> GuardOutcome {
    match (session, kind) {
        (QueryState::Idle | QueryState::Pending, _) => GuardOutcome::Checking,
        (QueryState::Succeeded(_), RouteKind::Protected) => GuardOutcome::Render,
        (QueryState::Succeeded(_), RouteKind::AuthOnly) => {
            GuardOutcome::Redirect(Redirect::replace(Route::Todos))
        }
        (QueryState::Failed(err), RouteKind::Protected) if err.is_unauthorized() => {
            GuardOutcome::Redirect(Redirect::replace(Route::Login))
        }
        (QueryState::Failed(err), RouteKind::AuthOnly) if err.is_unauthorized() => GuardOutcome::Render,
        (QueryState::Failed(err), _) => GuardOutcome::Error(err.to_string()),
    }
}

/// Runs the session check and applies `decide`.
#[derive(Debug, Clone)]
pub struct SessionGuard {
    auth: AuthClient,
    session: SessionCache,
}

impl SessionGuard {
    pub fn new(auth: AuthClient, session: SessionCache) -> Self {
        Self { auth, session }
    }

    /// Current session state, from cache when possible.
    ///
    /// A fresh identity is cached; a 401 clears whatever was cached.
    pub async fn check_session(&self) -> QueryState<User> {
        if let Some(user) = self.session.get().await {
            debug!(user_id = user.id, "session answered from cache");
            return QueryState::Succeeded(user);
        }

        match self.auth.me().await {
            Ok(user) => {
                self.session.set(user.clone()).await;
                QueryState::Succeeded(user)
            }
            Err(err) => {
                if err.is_unauthorized() {
                    self.session.invalidate().await;
                }
                QueryState::Failed(err)
            }
        }
    }

    pub async fn evaluate(&self, route: Route) -> GuardOutcome {
        let session = self.check_session().await;
        let outcome = decide(route.kind(), &session);
        if let GuardOutcome::Redirect(redirect) = &outcome {
            info!(from = %route, to = %redirect.to, "guard redirect");
        }
        outcome
    }
}
