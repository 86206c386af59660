use tracing::info;

use super::Outcome;
use crate::auth::AuthClient;
use crate::cache::SessionCache;
use crate::guard::Redirect;
use crate::query::QueryState;
use crate::routes::Route;
use crate::types::{Credentials, User};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Login,
    Register,
}

/// Sign-in or sign-up form.
#[derive(Debug, Clone)]
pub struct AuthForm {
    mode: AuthMode,
    auth: AuthClient,
    session: SessionCache,
    pub email: String,
    pub password: String,
    state: QueryState<User>,
}

impl AuthForm {
    pub fn new(mode: AuthMode, auth: AuthClient, session: SessionCache) -> Self {
        Self {
            mode,
            auth,
            session,
            email: String::new(),
            password: String::new(),
            state: QueryState::Idle,
        }
    }

    pub fn mode(&self) -> AuthMode {
        self.mode
    }

    pub fn state(&self) -> &QueryState<User> {
        &self.state
    }

    pub fn error_message(&self) -> Option<String> {
        self.state.error_message()
    }

    pub fn submit_label(&self) -> &'static str {
        match (self.mode, self.state.is_pending()) {
            (AuthMode::Login, false) => "Sign in",
            (AuthMode::Login, true) => "Signing in...",
            (AuthMode::Register, false) => "Create account",
            (AuthMode::Register, true) => "Creating...",
        }
    }

    /// The other form's route, for the footer link.
    pub fn alternate(&self) -> Route {
        match self.mode {
            AuthMode::Login => Route::Register,
            AuthMode::Register => Route::Login,
        }
    }

    /// Send the credentials unless either field is empty.
    ///
    /// The email is trimmed; the password is sent as typed. On success the
    /// identity replaces the cached session so the next guard check needs no
    /// round trip.
    pub async fn submit(&mut self) -> Outcome {
        match self.begin_submit() {
            Some(credentials) => self.complete_submit(credentials).await,
            None => Outcome::Skipped,
        }
    }

    /// First half of `submit`: the credentials to send, with the form now
    /// pending. `None` when either field is empty.
    pub fn begin_submit(&mut self) -> Option<Credentials> {
        let email = self.email.trim().to_string();
        if email.is_empty() || self.password.is_empty() {
            return None;
        }
        self.state = QueryState::Pending;
        Some(Credentials {
            email,
            password: self.password.clone(),
        })
    }

    /// Second half of `submit`.
    pub async fn complete_submit(&mut self, credentials: Credentials) -> Outcome {
        let Credentials { email, password } = credentials;
        let result = match self.mode {
            AuthMode::Login => self.auth.login(&email, &password).await,
            AuthMode::Register => self.auth.register(&email, &password).await,
        };

        match result {
            Ok(user) => {
                info!(user_id = user.id, mode = ?self.mode, "signed in");
                self.session.set(user.clone()).await;
                self.state = QueryState::Succeeded(user);
                Outcome::Redirect(Redirect::replace(Route::Todos))
            }
            Err(err) => {
                if err.is_unauthorized() {
                    self.session.invalidate().await;
                }
                self.state = QueryState::Failed(err);
                Outcome::Failed
            }
        }
    }
}
