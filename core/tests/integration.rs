//! Full session lifecycle against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives the client the way a
//! user would: anonymous visit, sign-up, todo CRUD through the todos page,
//! sign-out. Everything goes over real HTTP through `UreqTransport`, so the
//! session cookie jar is exercised too.

use std::sync::Arc;

use todo_client::pages::{HeaderView, Outcome, TodoFilter};
use todo_client::{
    ClientConfig, ClientError, GuardOutcome, Redirect, Route, Screen, TodoApp, TodoPatch, TodoStatus,
    UreqTransport,
};

async fn start_server() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { mock_server::run(listener).await.unwrap() });
    format!("http://{addr}")
}

async fn new_app() -> TodoApp {
    let base_url = start_server().await;
    TodoApp::new(&ClientConfig::new(&base_url), Arc::new(UreqTransport::new()))
}

#[tokio::test(flavor = "multi_thread")]
async fn session_lifecycle() {
    let app = new_app().await;
    let mut nav = app.navigator();

    // Step 1: anonymous visit to the todo list lands on login.
    assert_eq!(nav.navigate(Route::Todos).await, Screen::Page(Route::Login));
    assert_eq!(nav.history(), &[Route::Login]);
    assert!(matches!(app.header().view().await, HeaderView::Anonymous { .. }));

    // Step 2: register; the identity is cached and the guard lets us through.
    let mut form = app.register_form();
    form.email = "user@example.com".to_string();
    form.password = "password123".to_string();
    let Outcome::Redirect(redirect) = form.submit().await else {
        panic!("registration failed: {:?}", form.error_message());
    };
    assert_eq!(nav.follow(redirect).await, Screen::Page(Route::Todos));
    assert_eq!(
        app.header().view().await,
        HeaderView::SignedIn {
            email: "user@example.com".to_string()
        }
    );

    // Step 3: the cookie jar carries the session to the server.
    let me = app.auth.me().await.unwrap();
    assert_eq!(me.email, "user@example.com");

    // Step 4: create a todo and see it after the refetch.
    let mut page = app.todos_page();
    page.load().await;
    assert!(page.visible().is_empty());

    page.title = "Learn React Query".to_string();
    assert_eq!(page.add().await, Outcome::Done);
    let matching: Vec<_> = page
        .visible()
        .into_iter()
        .filter(|t| t.title == "Learn React Query")
        .collect();
    assert_eq!(matching.len(), 1);
    assert_eq!(matching[0].status, TodoStatus::InProgress);
    let id = matching[0].id;

    // Step 5: toggle to completed; it leaves the in-progress filter.
    page.filter = TodoFilter::Only(TodoStatus::InProgress);
    assert_eq!(page.toggle(id).await, Outcome::Done);
    assert!(page.visible().is_empty());
    page.filter = TodoFilter::Only(TodoStatus::Completed);
    assert_eq!(page.visible().len(), 1);

    // Step 6: rename, then delete.
    assert_eq!(page.rename(id, "  Learn axum ").await, Outcome::Done);
    page.filter = TodoFilter::All;
    assert_eq!(page.visible()[0].title, "Learn axum");
    assert_eq!(page.remove(id).await, Outcome::Done);
    assert!(page.visible().is_empty());

    // Step 7: updating a deleted todo reports the server's 404.
    let err = app
        .todos
        .update(id, &TodoPatch::status(TodoStatus::Backlog))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(404));

    // Step 8: sign out; caches are cleared and the guard sends us to login.
    let mut header = app.header();
    assert_eq!(header.sign_out().await, Outcome::Redirect(Redirect::replace(Route::Login)));
    assert!(app.session.is_empty().await);
    assert!(app.todo_list.is_empty().await);
    assert_eq!(
        app.guard().evaluate(Route::Todos).await,
        GuardOutcome::Redirect(Redirect::replace(Route::Login))
    );

    // Step 9: the server agrees the session is gone.
    let err = app.todos.list().await.unwrap_err();
    assert!(err.is_unauthorized());
}

#[tokio::test(flavor = "multi_thread")]
async fn login_with_existing_account() {
    let app = new_app().await;
    app.auth.register("old@example.com", "password123").await.unwrap();
    app.auth.logout().await.unwrap();

    let mut form = app.login_form();
    form.email = "old@example.com".to_string();
    form.password = "wrong".to_string();
    assert_eq!(form.submit().await, Outcome::Failed);
    assert_eq!(form.error_message().as_deref(), Some("Invalid credentials"));

    form.password = "password123".to_string();
    assert!(matches!(form.submit().await, Outcome::Redirect(_)));
    assert_eq!(app.guard().evaluate(Route::Login).await, GuardOutcome::Redirect(Redirect::replace(Route::Todos)));
}

#[tokio::test(flavor = "multi_thread")]
async fn unreachable_server_is_a_transport_error() {
    // Bind then drop to get a port nothing listens on.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let app = TodoApp::new(
        &ClientConfig::new(&format!("http://{addr}")),
        Arc::new(UreqTransport::new()),
    );
    let err = app.auth.me().await.unwrap_err();
    assert!(matches!(err, ClientError::Transport(_)));

    match app.guard().evaluate(Route::Todos).await {
        GuardOutcome::Error(message) => assert!(message.starts_with("network error")),
        other => panic!("expected error outcome, got {other:?}"),
    }
}
