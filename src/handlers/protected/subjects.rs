use axum::{
    extract::{Extension, Path},
    response::Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::database::manager::DatabaseManager;
use crate::database::models::subject::{NewSubject, SubjectPatch, SubjectStatus};
use crate::database::repositories::subjects::SubjectsRepository;
use crate::error::ApiError;
use crate::handlers::{parse_field, require_percent, require_present};
use crate::middleware::resolve_user::CurrentUser;

async fn repo() -> Result<SubjectsRepository, ApiError> {
    Ok(SubjectsRepository::new(DatabaseManager::pool().await?))
}

/// GET /api/subjects
pub async fn list(
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Json<Value>, ApiError> {
    let subjects = repo().await?.list(&user).await?;
    Ok(Json(json!({ "success": true, "data": subjects })))
}

#[derive(Debug, Deserialize)]
pub struct CreateSubjectRequest {
    pub name: String,
    pub progress: i32,
    pub status: String,
    pub weightage: i32,
}

/// POST /api/subjects
pub async fn create(
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(payload): Json<CreateSubjectRequest>,
) -> Result<Json<Value>, ApiError> {
    require_present("name", &payload.name)?;
    require_percent("progress", payload.progress)?;
    require_percent("weightage", payload.weightage)?;
    let status: SubjectStatus = parse_field("status", &payload.status)?;

    let id = repo()
        .await?
        .create(
            &user,
            NewSubject {
                name: payload.name,
                progress: payload.progress,
                status,
                weightage: payload.weightage,
            },
        )
        .await?;

    Ok(Json(json!({ "success": true, "data": { "id": id } })))
}

/// GET /api/subjects/:id
pub async fn get(
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let subject = repo().await?.get(&user, id).await?;
    Ok(Json(json!({ "success": true, "data": subject })))
}

#[derive(Debug, Deserialize)]
pub struct UpdateSubjectRequest {
    pub name: Option<String>,
    pub progress: Option<i32>,
    pub status: Option<String>,
    pub weightage: Option<i32>,
}

/// PATCH /api/subjects/:id
pub async fn update(
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateSubjectRequest>,
) -> Result<Json<Value>, ApiError> {
    if let Some(progress) = payload.progress {
        require_percent("progress", progress)?;
    }
    if let Some(weightage) = payload.weightage {
        require_percent("weightage", weightage)?;
    }
    let status = payload
        .status
        .as_deref()
        .map(|s| parse_field::<SubjectStatus>("status", s))
        .transpose()?;

    let id = repo()
        .await?
        .update(
            &user,
            id,
            SubjectPatch {
                name: payload.name,
                progress: payload.progress,
                status,
                weightage: payload.weightage,
            },
        )
        .await?;

    Ok(Json(json!({ "success": true, "data": { "id": id } })))
}

#[derive(Debug, Deserialize)]
pub struct UpdateProgressRequest {
    pub progress: i32,
    pub status: Option<String>,
}

/// PUT /api/subjects/:id/progress
pub async fn update_progress(
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProgressRequest>,
) -> Result<Json<Value>, ApiError> {
    require_percent("progress", payload.progress)?;
    let status = payload
        .status
        .as_deref()
        .map(|s| parse_field::<SubjectStatus>("status", s))
        .transpose()?;

    let id = repo()
        .await?
        .set_progress(&user, id, payload.progress, status)
        .await?;

    Ok(Json(json!({ "success": true, "data": { "id": id } })))
}

/// DELETE /api/subjects/:id
pub async fn delete(
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let id = repo().await?.delete(&user, id).await?;
    Ok(Json(json!({ "success": true, "data": { "id": id } })))
}
