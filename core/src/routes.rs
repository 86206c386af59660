//! The application's navigable routes and their guard classification.

use std::fmt;

/// How the session guard treats a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteKind {
    /// Needs a signed-in user; anonymous visitors go to login.
    Protected,
    /// Only for anonymous visitors; signed-in users go to the todo list.
    AuthOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Todos,
    Login,
    Register,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Route::Todos => "/todos",
            Route::Login => "/login",
            Route::Register => "/register",
        }
    }

    /// `/` is an alias of the todo list. Trailing slashes are ignored.
    pub fn from_path(path: &str) -> Option<Route> {
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" | "/todos" => Some(Route::Todos),
            "/login" => Some(Route::Login),
            "/register" => Some(Route::Register),
            _ => None,
        }
    }

    pub fn kind(self) -> RouteKind {
        match self {
            Route::Todos => RouteKind::Protected,
            Route::Login | Route::Register => RouteKind::AuthOnly,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}
