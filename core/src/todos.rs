//! Client for the `/api/v1/todos` resource.

use tracing::debug;

use crate::error::ClientResult;
use crate::http::HttpMethod;
use crate::request::{RequestCore, RequestInit};
use crate::types::{NewTodo, Todo, TodoPatch};

const TODOS: &str = "/api/v1/todos";

/// CRUD over the signed-in user's todos. Each method is exactly one call
/// through the shared request core.
#[derive(Debug, Clone)]
pub struct TodoClient {
    core: RequestCore,
}

impl TodoClient {
    pub fn new(core: RequestCore) -> Self {
        Self { core }
    }

    /// All todos, in whatever order the server returns them.
    pub async fn list(&self) -> ClientResult<Vec<Todo>> {
        let todos: Vec<Todo> = self.core.fetch(TODOS, RequestInit::default()).await?;
        debug!(count = todos.len(), "listed todos");
        Ok(todos)
    }

    pub async fn create(&self, title: &str) -> ClientResult<Todo> {
        let input = NewTodo {
            title: title.to_string(),
        };
        let init = RequestInit::json(HttpMethod::Post, &input)?;
        self.core.fetch(TODOS, init).await
    }

    pub async fn update(&self, id: u64, patch: &TodoPatch) -> ClientResult<Todo> {
        let init = RequestInit::json(HttpMethod::Patch, patch)?;
        self.core.fetch(&item_path(id), init).await
    }

    pub async fn delete(&self, id: u64) -> ClientResult<()> {
        self.core
            .execute(&item_path(id), RequestInit::method(HttpMethod::Delete))
            .await
    }
}

fn item_path(id: u64) -> String {
    format!("{TODOS}/{id}")
}
