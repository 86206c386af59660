//! Domain DTOs for the todo API.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently.
//! Integration tests catch any schema drift between the two crates. Field
//! names are camelCase on the wire; status values are snake_case.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Workflow state of a todo. The server's value is authoritative.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TodoStatus {
    Backlog,
    InProgress,
    Completed,
}

impl TodoStatus {
    /// Status requested by a single "toggle" click.
    pub fn toggled(self) -> Self {
        match self {
            Self::Completed => Self::InProgress,
            Self::Backlog | Self::InProgress => Self::Completed,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Backlog => "backlog",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for TodoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single todo item returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<u64>,
    pub title: String,
    pub status: TodoStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An account as reported by the auth endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: u64,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of the register and login calls.
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Request payload for creating a new todo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTodo {
    pub title: String,
}

/// Request payload for updating an existing todo. Only the fields present in
/// the JSON are applied; omitted fields remain unchanged on the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TodoPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TodoStatus>,
}

impl TodoPatch {
    pub fn status(status: TodoStatus) -> Self {
        Self {
            title: None,
            status: Some(status),
        }
    }

    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            status: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn todo_deserializes_camel_case_fields() {
        let todo: Todo = serde_json::from_str(
            r#"{"id":7,"userId":3,"title":"Test","status":"in_progress",
                "createdAt":"2024-01-01T00:00:00.000Z","updatedAt":"2024-01-02T00:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(todo.id, 7);
        assert_eq!(todo.user_id, Some(3));
        assert_eq!(todo.status, TodoStatus::InProgress);
        assert!(todo.updated_at > todo.created_at);
    }

    #[test]
    fn todo_without_owner_is_accepted() {
        let todo: Todo = serde_json::from_str(
            r#"{"id":1,"title":"Loose","status":"backlog",
                "createdAt":"2024-01-01T00:00:00Z","updatedAt":"2024-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert!(todo.user_id.is_none());
    }

    #[test]
    fn unknown_status_is_rejected() {
        let result: Result<TodoStatus, _> = serde_json::from_str(r#""done""#);
        assert!(result.is_err());
    }

    #[test]
    fn patch_omits_absent_fields() {
        let body = serde_json::to_value(TodoPatch::status(TodoStatus::Completed)).unwrap();
        assert_eq!(body, serde_json::json!({"status": "completed"}));

        let body = serde_json::to_value(TodoPatch::title("Renamed")).unwrap();
        assert_eq!(body, serde_json::json!({"title": "Renamed"}));
    }

    #[test]
    fn toggle_moves_between_completed_and_in_progress() {
        assert_eq!(TodoStatus::InProgress.toggled(), TodoStatus::Completed);
        assert_eq!(TodoStatus::Completed.toggled(), TodoStatus::InProgress);
        assert_eq!(TodoStatus::Backlog.toggled(), TodoStatus::Completed);
    }

    #[test]
    fn credentials_debug_hides_password() {
        let creds = Credentials {
            email: "user@example.com".to_string(),
            password: "hunter2".to_string(),
        };
        let debug = format!("{creds:?}");
        assert!(debug.contains("user@example.com"));
        assert!(!debug.contains("hunter2"));
    }
}
