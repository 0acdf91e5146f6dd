use axum::{
    extract::{Extension, Path, Query},
    response::Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::database::manager::DatabaseManager;
use crate::database::models::task::{NewTask, TaskPatch, TaskPriority, TaskStatus, TaskType};
use crate::database::repositories::tasks::TasksRepository;
use crate::error::ApiError;
use crate::handlers::{parse_field, require_present};
use crate::middleware::resolve_user::CurrentUser;

async fn repo() -> Result<TasksRepository, ApiError> {
    Ok(TasksRepository::new(DatabaseManager::pool().await?))
}

#[derive(Debug, Deserialize)]
pub struct TaskListQuery {
    pub due_date: Option<NaiveDate>,
    pub subject_id: Option<Uuid>,
    pub task_type: Option<String>,
}

/// GET /api/tasks - all tasks, or one secondary-key view at a time
pub async fn list(
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Query(query): Query<TaskListQuery>,
) -> Result<Json<Value>, ApiError> {
    let repo = repo().await?;

    let tasks = if let Some(date) = query.due_date {
        repo.list_by_date(&user, date).await?
    } else if let Some(subject_id) = query.subject_id {
        repo.list_by_subject(&user, subject_id).await?
    } else if let Some(task_type) = query.task_type.as_deref() {
        let task_type: TaskType = parse_field("task_type", task_type)?;
        repo.list_by_type(&user, task_type).await?
    } else {
        repo.list(&user).await?
    };

    Ok(Json(json!({ "success": true, "data": tasks })))
}

#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    pub title: String,
    pub subject_id: Uuid,
    pub task_type: String,
    pub status: String,
    pub priority: String,
    pub due_date: Option<NaiveDate>,
}

/// POST /api/tasks
pub async fn create(
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(payload): Json<CreateTaskRequest>,
) -> Result<Json<Value>, ApiError> {
    require_present("title", &payload.title)?;
    let task_type: TaskType = parse_field("task_type", &payload.task_type)?;
    let status: TaskStatus = parse_field("status", &payload.status)?;
    let priority: TaskPriority = parse_field("priority", &payload.priority)?;

    let id = repo()
        .await?
        .create(
            &user,
            NewTask {
                title: payload.title,
                subject_id: payload.subject_id,
                task_type,
                status,
                priority,
                due_date: payload.due_date,
            },
        )
        .await?;

    Ok(Json(json!({ "success": true, "data": { "id": id } })))
}

/// GET /api/tasks/:id
pub async fn get(
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let task = repo().await?.get(&user, id).await?;
    Ok(Json(json!({ "success": true, "data": task })))
}

#[derive(Debug, Deserialize)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub subject_id: Option<Uuid>,
    pub task_type: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub due_date: Option<NaiveDate>,
}

/// PATCH /api/tasks/:id
pub async fn update(
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTaskRequest>,
) -> Result<Json<Value>, ApiError> {
    let task_type = payload
        .task_type
        .as_deref()
        .map(|s| parse_field::<TaskType>("task_type", s))
        .transpose()?;
    let status = payload
        .status
        .as_deref()
        .map(|s| parse_field::<TaskStatus>("status", s))
        .transpose()?;
    let priority = payload
        .priority
        .as_deref()
        .map(|s| parse_field::<TaskPriority>("priority", s))
        .transpose()?;

    let id = repo()
        .await?
        .update(
            &user,
            id,
            TaskPatch {
                title: payload.title,
                subject_id: payload.subject_id,
                task_type,
                status,
                priority,
                due_date: payload.due_date,
            },
        )
        .await?;

    Ok(Json(json!({ "success": true, "data": { "id": id } })))
}

#[derive(Debug, Deserialize)]
pub struct UpdateTaskStatusRequest {
    pub status: String,
}

/// PUT /api/tasks/:id/status
pub async fn update_status(
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTaskStatusRequest>,
) -> Result<Json<Value>, ApiError> {
    let status: TaskStatus = parse_field("status", &payload.status)?;
    let id = repo().await?.set_status(&user, id, status).await?;
    Ok(Json(json!({ "success": true, "data": { "id": id } })))
}

/// DELETE /api/tasks/:id
pub async fn delete(
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let id = repo().await?.delete(&user, id).await?;
    Ok(Json(json!({ "success": true, "data": { "id": id } })))
}
