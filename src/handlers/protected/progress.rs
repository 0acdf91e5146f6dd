use axum::{extract::Extension, response::Json};
use serde_json::{json, Value};

use crate::analytics::progress::overall_progress;
use crate::database::manager::DatabaseManager;
use crate::database::models::task::TaskStatus;
use crate::database::repositories::tasks::TasksRepository;
use crate::error::ApiError;
use crate::middleware::resolve_user::CurrentUser;

/// GET /api/progress - overall progress across the caller's tasks
pub async fn overview(
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Json<Value>, ApiError> {
    let tasks = TasksRepository::new(DatabaseManager::pool().await?)
        .list(&user)
        .await?;

    let completed = tasks
        .iter()
        .filter(|t| t.status == TaskStatus::Completed)
        .count();

    Ok(Json(json!({
        "success": true,
        "data": {
            "overall_progress": overall_progress(&tasks),
            "total_tasks": tasks.len(),
            "completed_tasks": completed,
        }
    })))
}
