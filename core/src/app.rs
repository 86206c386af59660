//! Wiring and navigation.
//!
//! `TodoApp` builds one request core over one transport and hands clones of
//! it, and of the two caches, to every client, guard and view model.
//! `Navigator` is the routing surface: a history stack whose entries are
//! resolved through the session guard.

use std::sync::Arc;

use tracing::debug;

use crate::auth::AuthClient;
use crate::cache::{session_cache, todo_list_cache, SessionCache, TodoListCache};
use crate::config::ClientConfig;
use crate::guard::{GuardOutcome, Redirect, SessionGuard};
use crate::http::{Transport, UreqTransport};
use crate::pages::{AppHeader, AuthForm, AuthMode, TodosPage};
use crate::request::RequestCore;
use crate::routes::Route;
use crate::todos::TodoClient;

/// Redirect chains longer than this are reported as an error.
const MAX_REDIRECTS: usize = 4;

#[derive(Debug, Clone)]
pub struct TodoApp {
    pub auth: AuthClient,
    pub todos: TodoClient,
    pub session: SessionCache,
    pub todo_list: TodoListCache,
}

impl TodoApp {
    pub fn new(config: &ClientConfig, transport: Arc<dyn Transport>) -> Self {
        let core = RequestCore::new(&config.base_url, transport);
        Self {
            auth: AuthClient::new(core.clone()),
            todos: TodoClient::new(core),
            session: session_cache(),
            todo_list: todo_list_cache(),
        }
    }

    /// `ClientConfig::from_env` over a cookie-keeping ureq transport.
    pub fn from_env() -> Self {
        Self::new(&ClientConfig::from_env(), Arc::new(UreqTransport::new()))
    }

    pub fn guard(&self) -> SessionGuard {
        SessionGuard::new(self.auth.clone(), self.session.clone())
    }

    pub fn navigator(&self) -> Navigator {
        Navigator::new(self.guard())
    }

    pub fn login_form(&self) -> AuthForm {
        AuthForm::new(AuthMode::Login, self.auth.clone(), self.session.clone())
    }

    pub fn register_form(&self) -> AuthForm {
        AuthForm::new(AuthMode::Register, self.auth.clone(), self.session.clone())
    }

    pub fn todos_page(&self) -> TodosPage {
        TodosPage::new(self.todos.clone(), self.todo_list.clone(), self.session.clone())
    }

    pub fn header(&self) -> AppHeader {
        AppHeader::new(self.auth.clone(), self.session.clone(), self.todo_list.clone())
    }
}

/// What ends up on screen after a navigation settles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Page(Route),
    Error { route: Route, message: String },
}

#[derive(Debug, Clone)]
pub struct Navigator {
    guard: SessionGuard,
    history: Vec<Route>,
}

impl Navigator {
    pub fn new(guard: SessionGuard) -> Self {
        Self {
            guard,
            history: Vec::new(),
        }
    }

    pub fn current(&self) -> Option<Route> {
        self.history.last().copied()
    }

    pub fn history(&self) -> &[Route] {
        &self.history
    }

    /// Push `route` and resolve it.
    pub async fn navigate(&mut self, route: Route) -> Screen {
        self.history.push(route);
        self.resolve().await
    }

    /// `None` when the path names no route.
    pub async fn navigate_path(&mut self, path: &str) -> Option<Screen> {
        let route = Route::from_path(path)?;
        Some(self.navigate(route).await)
    }

    /// Apply a redirect handed back by a view model.
    pub async fn follow(&mut self, redirect: Redirect) -> Screen {
        self.apply(redirect);
        self.resolve().await
    }

    /// Pop the current entry and resolve the one below it.
    pub async fn back(&mut self) -> Option<Screen> {
        if self.history.len() < 2 {
            return None;
        }
        self.history.pop();
        Some(self.resolve().await)
    }

    fn apply(&mut self, redirect: Redirect) {
        if redirect.replace {
            self.history.pop();
        }
        self.history.push(redirect.to);
    }

    async fn resolve(&mut self) -> Screen {
        for _ in 0..=MAX_REDIRECTS {
            let Some(route) = self.current() else {
                self.history.push(Route::Todos);
                continue;
            };
            match self.guard.evaluate(route).await {
                GuardOutcome::Render => return Screen::Page(route),
                GuardOutcome::Error(message) => return Screen::Error { route, message },
                GuardOutcome::Redirect(redirect) => {
                    debug!(from = %route, to = %redirect.to, "following redirect");
                    self.apply(redirect);
                }
                // evaluate never yields Checking
                GuardOutcome::Checking => continue,
            }
        }
        Screen::Error {
            route: self.current().unwrap_or(Route::Todos),
            message: "too many redirects".to_string(),
        }
    }
}
