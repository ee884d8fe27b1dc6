use tracing::info;
use uuid::Uuid;

use super::{
    dto::{CreateTodoRequest, UpdateTodoRequest},
    repo_types::{NewTodo, Todo, TodoChanges},
};
use crate::{error::AppError, state::AppState};

pub const MAX_TITLE_LEN: usize = 200;
pub const MAX_DESCRIPTION_LEN: usize = 1000;

fn validate_title(raw: &str) -> Result<String, AppError> {
    let title = raw.trim();
    if title.is_empty() {
        return Err(AppError::Validation("Title is required".into()));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(AppError::Validation("Title too long".into()));
    }
    Ok(title.to_string())
}

fn validate_description(raw: &str) -> Result<String, AppError> {
    let description = raw.trim();
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(AppError::Validation("Description too long".into()));
    }
    Ok(description.to_string())
}

pub(crate) fn new_todo(req: CreateTodoRequest) -> Result<NewTodo, AppError> {
    Ok(NewTodo {
        title: validate_title(&req.title)?,
        description: validate_description(req.description.as_deref().unwrap_or_default())?,
    })
}

pub(crate) fn todo_changes(req: UpdateTodoRequest) -> Result<TodoChanges, AppError> {
    Ok(TodoChanges {
        title: req.title.as_deref().map(validate_title).transpose()?,
        description: req
            .description
            .as_deref()
            .map(validate_description)
            .transpose()?,
        completed: req.completed,
    })
}

fn not_found() -> AppError {
    AppError::NotFound("Todo not found".into())
}

/// Path ids that are not UUIDs are reported exactly like missing todos.
pub(crate) fn parse_todo_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| not_found())
}

pub async fn create(
    state: &AppState,
    owner_id: Uuid,
    req: CreateTodoRequest,
) -> Result<Todo, AppError> {
    let todo = state.todos.create(owner_id, new_todo(req)?).await?;
    info!(todo_id = %todo.id, %owner_id, "todo created");
    Ok(todo)
}

pub async fn list(state: &AppState, owner_id: Uuid) -> Result<Vec<Todo>, AppError> {
    Ok(state.todos.list(owner_id).await?)
}

pub async fn update(
    state: &AppState,
    owner_id: Uuid,
    id: Uuid,
    req: UpdateTodoRequest,
) -> Result<Todo, AppError> {
    let changes = todo_changes(req)?;
    state
        .todos
        .update(owner_id, id, changes)
        .await?
        .ok_or_else(not_found)
}

pub async fn delete(state: &AppState, owner_id: Uuid, id: Uuid) -> Result<(), AppError> {
    if !state.todos.delete(owner_id, id).await? {
        return Err(not_found());
    }
    info!(todo_id = %id, %owner_id, "todo deleted");
    Ok(())
}
