use serde::{Deserialize, Serialize};

use super::repo_types::Todo;

#[derive(Debug, Deserialize)]
pub struct CreateTodoRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Absent and `null` fields both mean "leave unchanged".
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTodoRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct TodoResponse {
    pub success: bool,
    pub todo: Todo,
}

#[derive(Debug, Serialize)]
pub struct TodoListResponse {
    pub success: bool,
    pub todos: Vec<Todo>,
}
