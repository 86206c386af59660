//! UI-framework independent view models for the three screens and the
//! header. Each holds its form fields and `QueryState`s and exposes the
//! actions a user can trigger; a renderer only reads them.

mod auth_form;
mod header;
mod todos_page;

pub use auth_form::{AuthForm, AuthMode};
pub use header::{AppHeader, HeaderView};
pub use todos_page::{TodoFilter, TodosPage, EMPTY_MESSAGE, LOADING_MESSAGE};

use crate::guard::Redirect;

/// Result of a user action on a view model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Input was empty; nothing was sent.
    Skipped,
    Done,
    /// The call failed; the error is held in the view model's state.
    Failed,
    /// The user should be taken elsewhere: after a sign-in or sign-out, or
    /// when the server no longer recognizes the session.
    Redirect(Redirect),
}
