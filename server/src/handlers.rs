//! One handler per endpoint.
//!
//! Handlers decode and validate input, make exactly one store call, and
//! shape the response. Update, toggle and delete report success even when no
//! row matched the id; only the single-todo lookup answers 404.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use todo_core::{decode, parse_todo_id, CreateTodo, Todo, UpdateTodo};

use crate::error::ApiError;
use crate::AppState;

pub async fn list_todos(State(state): State<AppState>) -> Result<Json<Vec<Todo>>, ApiError> {
    Ok(Json(state.store.list_all().await?))
}

pub async fn get_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Todo>, ApiError> {
    let id = parse_todo_id(&id)?;
    state
        .store
        .find_by_id(id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

pub async fn create_todo(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Todo>, ApiError> {
    let title = decode::<CreateTodo>(&body)?.validate()?;
    let todo = state.store.insert(&title).await?;
    tracing::debug!(id = todo.id, "created todo");
    Ok(Json(todo))
}

/// The echoed `created_at` is the time of the update, not the stored value.
pub async fn update_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Todo>, ApiError> {
    let id = parse_todo_id(&id)?;
    let changes = decode::<UpdateTodo>(&body)?.validate()?;
    let affected = state.store.update_by_id(id, &changes).await?;
    tracing::debug!(id, affected, "updated todo");
    Ok(Json(Todo {
        id,
        title: changes.title.into_inner(),
        completed: changes.completed,
        created_at: Utc::now(),
    }))
}

pub async fn toggle_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_todo_id(&id)?;
    let affected = state.store.toggle_by_id(id).await?;
    tracing::debug!(id, affected, "toggled todo");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_todo_id(&id)?;
    let affected = state.store.delete_by_id(id).await?;
    tracing::debug!(id, affected, "deleted todo");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn clear_completed(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    let removed = state.store.delete_all_completed().await?;
    tracing::debug!(removed, "cleared completed todos");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}
