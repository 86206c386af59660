use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "session";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TodoStatus {
    Backlog,
    InProgress,
    Completed,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: u64,
    pub user_id: u64,
    pub title: String,
    pub status: TodoStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: u64,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct CreateTodo {
    pub title: String,
}

#[derive(Deserialize)]
pub struct UpdateTodo {
    pub title: Option<String>,
    pub status: Option<TodoStatus>,
}

struct Account {
    user: User,
    // In-memory mock; never persisted.
    password: String,
}

#[derive(Default)]
pub struct Store {
    accounts: Vec<Account>,
    sessions: HashMap<String, u64>,
    todos: BTreeMap<u64, Todo>,
    next_user_id: u64,
    next_todo_id: u64,
}

pub type Db = Arc<RwLock<Store>>;

type ApiResult<T> = Result<T, (StatusCode, &'static str)>;

const UNAUTHORIZED: (StatusCode, &str) = (StatusCode::UNAUTHORIZED, "Unauthorized");
const TODO_NOT_FOUND: (StatusCode, &str) = (StatusCode::NOT_FOUND, "Todo not found");

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/api/v1/auth/register", post(register))
        .route("/api/v1/auth/login", post(login))
        .route("/api/v1/auth/logout", post(logout))
        .route("/api/v1/auth/me", get(me))
        .route("/api/v1/todos", get(list_todos).post(create_todo))
        .route("/api/v1/todos/{id}", patch(update_todo).delete(delete_todo))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn session_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, token)| token)
}

fn session_cookie(token: &str) -> String {
    format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax")
}

fn current_user(store: &Store, headers: &HeaderMap) -> ApiResult<u64> {
    session_token(headers)
        .and_then(|token| store.sessions.get(token).copied())
        .ok_or(UNAUTHORIZED)
}

fn start_session(store: &mut Store, user_id: u64) -> String {
    let token = Uuid::new_v4().to_string();
    store.sessions.insert(token.clone(), user_id);
    token
}

async fn register(State(db): State<Db>, Json(input): Json<Credentials>) -> ApiResult<Response> {
    let email = input.email.trim().to_lowercase();
    if email.is_empty() || input.password.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Email and password are required"));
    }

    let mut store = db.write().await;
    if store.accounts.iter().any(|a| a.user.email == email) {
        return Err((StatusCode::CONFLICT, "Email already registered"));
    }

    store.next_user_id += 1;
    let now = Utc::now();
    let user = User {
        id: store.next_user_id,
        email,
        created_at: now,
        updated_at: now,
    };
    store.accounts.push(Account {
        user: user.clone(),
        password: input.password,
    });
    let token = start_session(&mut store, user.id);
    tracing::info!(user_id = user.id, "registered");

    Ok((
        StatusCode::CREATED,
        [(header::SET_COOKIE, session_cookie(&token))],
        Json(user),
    )
        .into_response())
}

async fn login(State(db): State<Db>, Json(input): Json<Credentials>) -> ApiResult<Response> {
    let email = input.email.trim().to_lowercase();
    let mut store = db.write().await;
    let user = store
        .accounts
        .iter()
        .find(|a| a.user.email == email && a.password == input.password)
        .map(|a| a.user.clone())
        .ok_or((StatusCode::UNAUTHORIZED, "Invalid credentials"))?;

    let token = start_session(&mut store, user.id);
    tracing::info!(user_id = user.id, "logged in");

    Ok(([(header::SET_COOKIE, session_cookie(&token))], Json(user)).into_response())
}

async fn logout(State(db): State<Db>, headers: HeaderMap) -> Response {
    if let Some(token) = session_token(&headers) {
        db.write().await.sessions.remove(token);
    }
    let expired = format!("{SESSION_COOKIE}=; Path=/; HttpOnly; Max-Age=0");
    (StatusCode::NO_CONTENT, [(header::SET_COOKIE, expired)]).into_response()
}

async fn me(State(db): State<Db>, headers: HeaderMap) -> ApiResult<Json<User>> {
    let store = db.read().await;
    let user_id = current_user(&store, &headers)?;
    store
        .accounts
        .iter()
        .find(|a| a.user.id == user_id)
        .map(|a| Json(a.user.clone()))
        .ok_or(UNAUTHORIZED)
}

/// Newest first.
async fn list_todos(State(db): State<Db>, headers: HeaderMap) -> ApiResult<Json<Vec<Todo>>> {
    let store = db.read().await;
    let user_id = current_user(&store, &headers)?;
    let todos = store
        .todos
        .values()
        .rev()
        .filter(|t| t.user_id == user_id)
        .cloned()
        .collect();
    Ok(Json(todos))
}

async fn create_todo(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<CreateTodo>,
) -> ApiResult<(StatusCode, Json<Todo>)> {
    let mut store = db.write().await;
    let user_id = current_user(&store, &headers)?;
    let title = input.title.trim();
    if title.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Title is required"));
    }

    store.next_todo_id += 1;
    let now = Utc::now();
    let todo = Todo {
        id: store.next_todo_id,
        user_id,
        title: title.to_string(),
        status: TodoStatus::InProgress,
        created_at: now,
        updated_at: now,
    };
    store.todos.insert(todo.id, todo.clone());
    Ok((StatusCode::CREATED, Json(todo)))
}

async fn update_todo(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<u64>,
    Json(input): Json<UpdateTodo>,
) -> ApiResult<Json<Todo>> {
    let mut store = db.write().await;
    let user_id = current_user(&store, &headers)?;
    let todo = store
        .todos
        .get_mut(&id)
        .filter(|t| t.user_id == user_id)
        .ok_or(TODO_NOT_FOUND)?;
    if let Some(title) = input.title {
        let title = title.trim();
        if title.is_empty() {
            return Err((StatusCode::BAD_REQUEST, "Title is required"));
        }
        todo.title = title.to_string();
    }
    if let Some(status) = input.status {
        todo.status = status;
    }
    todo.updated_at = Utc::now();
    Ok(Json(todo.clone()))
}

async fn delete_todo(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> ApiResult<StatusCode> {
    let mut store = db.write().await;
    let user_id = current_user(&store, &headers)?;
    let owned = store.todos.get(&id).is_some_and(|t| t.user_id == user_id);
    if !owned {
        return Err(TODO_NOT_FOUND);
    }
    store.todos.remove(&id);
    Ok(StatusCode::NO_CONTENT)
}
