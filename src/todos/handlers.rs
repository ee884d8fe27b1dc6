use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use tracing::instrument;

use super::{
    dto::{CreateTodoRequest, TodoListResponse, TodoResponse, UpdateTodoRequest},
    services,
};
use crate::{
    auth::extractors::AuthUser,
    error::AppError,
    http::{MessageResponse, Payload},
    state::AppState,
};

pub fn todo_routes() -> Router<AppState> {
    Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/:id", put(update_todo).delete(delete_todo))
}

#[instrument(skip(state, body))]
pub async fn create_todo(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Payload(body): Payload<CreateTodoRequest>,
) -> Result<(StatusCode, Json<TodoResponse>), AppError> {
    let todo = services::create(&state, user_id, body).await?;
    Ok((
        StatusCode::CREATED,
        Json(TodoResponse {
            success: true,
            todo,
        }),
    ))
}

#[instrument(skip(state))]
pub async fn list_todos(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<TodoListResponse>, AppError> {
    let todos = services::list(&state, user_id).await?;
    Ok(Json(TodoListResponse {
        success: true,
        todos,
    }))
}

#[instrument(skip(state, body))]
pub async fn update_todo(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
    Payload(body): Payload<UpdateTodoRequest>,
) -> Result<Json<TodoResponse>, AppError> {
    let id = services::parse_todo_id(&id)?;
    let todo = services::update(&state, user_id, id, body).await?;
    Ok(Json(TodoResponse {
        success: true,
        todo,
    }))
}

#[instrument(skip(state))]
pub async fn delete_todo(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = services::parse_todo_id(&id)?;
    services::delete(&state, user_id, id).await?;
    Ok(MessageResponse::ok("Todo deleted successfully"))
}
