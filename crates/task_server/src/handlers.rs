use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use task_core::{AppError, NewTask, Task, TaskPatch, TaskRepository};

use crate::error::ApiError;
use crate::identity::Owner;
use crate::state::AppState;

pub const DELETED_MESSAGE: &str = "Task deleted successfully";

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

async fn run_blocking<T, F>(repository: TaskRepository, work: F) -> Result<T, ApiError>
where
    F: FnOnce(&TaskRepository) -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    let outcome = tokio::task::spawn_blocking(move || work(&repository))
        .await
        .map_err(|err| AppError::unexpected(err.to_string()))?;
    Ok(outcome?)
}

// Only JSON objects are accepted; derived structs would also decode from arrays.
fn object_body<T: DeserializeOwned>(
    body: Result<Json<Value>, JsonRejection>,
) -> Result<T, ApiError> {
    let Json(value) = body?;
    if !value.is_object() {
        return Err(AppError::validation("request body must be a JSON object").into());
    }
    serde_json::from_value(value).map_err(|err| AppError::validation(err.to_string()).into())
}

pub async fn create_task(
    State(state): State<AppState>,
    Owner(owner): Owner,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let request: NewTask = object_body(body)?;
    let task = run_blocking(state.repository, move |repository| {
        repository.for_owner(owner).create(request)
    })
    .await?;

    tracing::info!(task_id = %task.id, owner = %task.user_id, "task created");
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn list_tasks(
    State(state): State<AppState>,
    Owner(owner): Owner,
) -> Result<Json<Vec<Task>>, ApiError> {
    let tasks = run_blocking(state.repository, move |repository| {
        repository.for_owner(owner).list()
    })
    .await?;
    Ok(Json(tasks))
}

pub async fn update_task(
    State(state): State<AppState>,
    Owner(owner): Owner,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Task>, ApiError> {
    let patch: TaskPatch = object_body(body)?;
    let task = run_blocking(state.repository, move |repository| {
        repository.for_owner(owner).update(&id, patch)
    })
    .await?;
    Ok(Json(task))
}

pub async fn delete_task(
    State(state): State<AppState>,
    Owner(owner): Owner,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let removed = run_blocking(state.repository, move |repository| {
        repository.for_owner(owner).delete(&id)
    })
    .await?;

    tracing::info!(task_id = %removed.id, owner = %removed.user_id, "task deleted");
    Ok(Json(MessageResponse {
        message: DELETED_MESSAGE.to_string(),
    }))
}
