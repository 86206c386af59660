use tracing::{info, warn};

use super::Outcome;
use crate::auth::AuthClient;
use crate::cache::{SessionCache, TodoListCache};
use crate::guard::Redirect;
use crate::query::QueryState;
use crate::routes::Route;

/// What the header shows for the current session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderView {
    SignedIn { email: String },
    /// Links to the auth screens.
    Anonymous { links: [Route; 2] },
}

/// App header with the signed-in user and the sign-out action.
#[derive(Debug, Clone)]
pub struct AppHeader {
    auth: AuthClient,
    session: SessionCache,
    todo_list: TodoListCache,
    sign_out: QueryState<()>,
}

impl AppHeader {
    pub fn new(auth: AuthClient, session: SessionCache, todo_list: TodoListCache) -> Self {
        Self {
            auth,
            session,
            todo_list,
            sign_out: QueryState::Idle,
        }
    }

    /// Reads the cached identity only; the guard is what fills it.
    pub async fn view(&self) -> HeaderView {
        match self.session.get().await {
            Some(user) => HeaderView::SignedIn { email: user.email },
            None => HeaderView::Anonymous {
                links: [Route::Login, Route::Register],
            },
        }
    }

    pub fn sign_out_state(&self) -> &QueryState<()> {
        &self.sign_out
    }

    /// Sign out and go to login.
    ///
    /// A 401 means the session was already gone, which is treated the same
    /// as a successful sign-out. Other failures keep the session.
    pub async fn sign_out(&mut self) -> Outcome {
        self.sign_out = QueryState::Pending;
        match self.auth.logout().await {
            Ok(()) => info!("signed out"),
            Err(err) if err.is_unauthorized() => info!("session already expired at sign-out"),
            Err(err) => {
                warn!(error = %err, "sign-out failed");
                self.sign_out = QueryState::Failed(err);
                return Outcome::Failed;
            }
        }

        self.session.invalidate().await;
        self.todo_list.invalidate().await;
        self.sign_out = QueryState::Succeeded(());
        Outcome::Redirect(Redirect::replace(Route::Login))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::cache::{session_cache, todo_list_cache};
    use crate::request::RequestCore;
    use crate::test_support::{user_json, ScriptedTransport};

    async fn signed_in_header(transport: &Arc<ScriptedTransport>) -> (AppHeader, SessionCache) {
        let session = session_cache();
        session
            .set(serde_json::from_value(user_json(1, "user@example.com")).unwrap())
            .await;
        let auth = AuthClient::new(RequestCore::new("http://api", transport.clone()));
        (AppHeader::new(auth, session.clone(), todo_list_cache()), session)
    }

    #[tokio::test]
    async fn shows_user_and_signs_out() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond(204, "");
        let (mut header, session) = signed_in_header(&transport).await;

        assert_eq!(
            header.view().await,
            HeaderView::SignedIn {
                email: "user@example.com".to_string()
            }
        );
        assert_eq!(
            header.sign_out().await,
            Outcome::Redirect(Redirect::replace(Route::Login))
        );
        assert!(session.is_empty().await);
        assert!(matches!(header.view().await, HeaderView::Anonymous { .. }));
    }

    #[tokio::test]
    async fn expired_session_still_lands_on_login() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond(401, "Unauthorized");
        let (mut header, session) = signed_in_header(&transport).await;

        assert_eq!(
            header.sign_out().await,
            Outcome::Redirect(Redirect::replace(Route::Login))
        );
        assert!(session.is_empty().await);
    }

    #[tokio::test]
    async fn other_failures_keep_the_session() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond(500, "db down");
        let (mut header, session) = signed_in_header(&transport).await;

        assert_eq!(header.sign_out().await, Outcome::Failed);
        assert_eq!(header.sign_out_state().error_message().as_deref(), Some("db down"));
        assert!(!session.is_empty().await);
    }

    #[tokio::test]
    async fn anonymous_header_links_to_auth_screens() {
        let transport = Arc::new(ScriptedTransport::new());
        let auth = AuthClient::new(RequestCore::new("http://api", transport.clone()));
        let header = AppHeader::new(auth, session_cache(), todo_list_cache());
        assert_eq!(
            header.view().await,
            HeaderView::Anonymous {
                links: [Route::Login, Route::Register]
            }
        );
    }
}
