use tracing::{debug, info};

use super::Outcome;
use crate::cache::{SessionCache, TodoListCache};
use crate::error::{ClientError, ClientResult};
use crate::guard::Redirect;
use crate::query::QueryState;
use crate::routes::Route;
use crate::todos::TodoClient;
use crate::types::{Todo, TodoPatch, TodoStatus};

pub const EMPTY_MESSAGE: &str = "Nothing here yet. Add a todo above.";
pub const LOADING_MESSAGE: &str = "Loading todos...";

/// Which todos the list shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TodoFilter {
    #[default]
    All,
    Only(TodoStatus),
}

impl TodoFilter {
    pub fn matches(self, todo: &Todo) -> bool {
        match self {
            TodoFilter::All => true,
            TodoFilter::Only(status) => todo.status == status,
        }
    }
}

/// The todo list screen.
///
/// The list is never patched locally: every successful mutation drops the
/// cached list and fetches it again, so what is shown is always what the
/// server last returned. A 401 from any call drops the cached identity, so
/// the next guard check asks the server and ends on the login page.
#[derive(Debug, Clone)]
pub struct TodosPage {
    client: TodoClient,
    cache: TodoListCache,
    session: SessionCache,
    pub title: String,
    pub filter: TodoFilter,
    list: QueryState<Vec<Todo>>,
    adding: QueryState<Todo>,
    mutation: QueryState<()>,
}

impl TodosPage {
    pub fn new(client: TodoClient, cache: TodoListCache, session: SessionCache) -> Self {
        Self {
            client,
            cache,
            session,
            title: String::new(),
            filter: TodoFilter::All,
            list: QueryState::Idle,
            adding: QueryState::Idle,
            mutation: QueryState::Idle,
        }
    }

    pub fn list(&self) -> &QueryState<Vec<Todo>> {
        &self.list
    }

    pub fn adding(&self) -> &QueryState<Todo> {
        &self.adding
    }

    pub fn mutation(&self) -> &QueryState<()> {
        &self.mutation
    }

    pub fn add_label(&self) -> &'static str {
        if self.adding.is_pending() {
            "Adding..."
        } else {
            "Add"
        }
    }

    /// Todos passing the current filter, in server order.
    pub fn visible(&self) -> Vec<&Todo> {
        self.list
            .data()
            .map(|todos| todos.iter().filter(|t| self.filter.matches(t)).collect())
            .unwrap_or_default()
    }

    /// Placeholder text for the list area, if any.
    pub fn placeholder(&self) -> Option<&'static str> {
        match &self.list {
            QueryState::Idle | QueryState::Pending => Some(LOADING_MESSAGE),
            QueryState::Succeeded(_) if self.visible().is_empty() => Some(EMPTY_MESSAGE),
            _ => None,
        }
    }

    /// Show the cached list if there is one, otherwise fetch.
    pub async fn load(&mut self) {
        match self.cache.get().await {
            Some(todos) => self.list = QueryState::Succeeded(todos),
            None => self.refresh().await,
        }
    }

    /// Fetch the list and replace the cache wholesale.
    pub async fn refresh(&mut self) {
        self.list = QueryState::Pending;
        match self.client.list().await {
            Ok(todos) => {
                self.cache.set(todos.clone()).await;
                self.list = QueryState::Succeeded(todos);
            }
            Err(err) => {
                self.signed_out(&err).await;
                self.list = QueryState::Failed(err);
            }
        }
    }

    /// Create a todo from the trimmed title input.
    pub async fn add(&mut self) -> Outcome {
        match self.begin_add() {
            Some(title) => self.complete_add(title).await,
            None => Outcome::Skipped,
        }
    }

    /// First half of `add`: the trimmed title to send, with `adding` now
    /// pending. `None` when the title is blank.
    pub fn begin_add(&mut self) -> Option<String> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return None;
        }
        self.adding = QueryState::Pending;
        Some(title)
    }

    /// Second half of `add`.
    pub async fn complete_add(&mut self, title: String) -> Outcome {
        match self.client.create(&title).await {
            Ok(todo) => {
                debug!(id = todo.id, "todo created");
                self.adding = QueryState::Succeeded(todo);
                self.title.clear();
                self.after_mutation().await;
                Outcome::Done
            }
            Err(err) => {
                let outcome = self.failed(&err).await;
                self.adding = QueryState::Failed(err);
                outcome
            }
        }
    }

    /// Flip between completed and in progress. Unknown ids are skipped.
    pub async fn toggle(&mut self, id: u64) -> Outcome {
        let Some(current) = self.find(id).map(|t| t.status) else {
            return Outcome::Skipped;
        };
        self.set_status(id, current.toggled()).await
    }

    pub async fn set_status(&mut self, id: u64, status: TodoStatus) -> Outcome {
        let patch = TodoPatch::status(status);
        let result = self.client.update(id, &patch).await.map(|_| ());
        self.finish(result).await
    }

    pub async fn rename(&mut self, id: u64, title: &str) -> Outcome {
        let title = title.trim();
        if title.is_empty() {
            return Outcome::Skipped;
        }
        let result = self.client.update(id, &TodoPatch::title(title)).await.map(|_| ());
        self.finish(result).await
    }

    pub async fn remove(&mut self, id: u64) -> Outcome {
        let result = self.client.delete(id).await;
        self.finish(result).await
    }

    fn find(&self, id: u64) -> Option<&Todo> {
        self.list.data()?.iter().find(|t| t.id == id)
    }

    async fn finish(&mut self, result: ClientResult<()>) -> Outcome {
        match result {
            Ok(()) => {
                self.mutation = QueryState::Succeeded(());
                self.after_mutation().await;
                Outcome::Done
            }
            Err(err) => {
                let outcome = self.failed(&err).await;
                self.mutation = QueryState::Failed(err);
                outcome
            }
        }
    }

    async fn failed(&self, err: &ClientError) -> Outcome {
        if self.signed_out(err).await {
            Outcome::Redirect(Redirect::replace(Route::Login))
        } else {
            Outcome::Failed
        }
    }

    /// Drop the cached identity when the server no longer knows the session.
    async fn signed_out(&self, err: &ClientError) -> bool {
        if !err.is_unauthorized() {
            return false;
        }
        info!("session expired");
        self.session.invalidate().await;
        true
    }

    async fn after_mutation(&mut self) {
        self.cache.invalidate().await;
        self.refresh().await;
    }
}
