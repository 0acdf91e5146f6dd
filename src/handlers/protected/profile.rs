use axum::{extract::Extension, response::Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::database::manager::DatabaseManager;
use crate::database::models::user::UserPatch;
use crate::database::repositories::users::UsersRepository;
use crate::error::ApiError;
use crate::middleware::resolve_user::CurrentUser;

/// GET /api/profile - the resolved caller's own record
pub async fn get(Extension(CurrentUser(user)): Extension<CurrentUser>) -> Json<Value> {
    Json(json!({ "success": true, "data": user }))
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub avatar_url: Option<String>,
    pub target_score: Option<f64>,
}

/// PATCH /api/profile - partial update of the caller's own record
pub async fn update(
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<Value>, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let id = UsersRepository::new(pool)
        .update_profile(
            &user,
            UserPatch {
                name: payload.name,
                email: payload.email,
                avatar_url: payload.avatar_url,
                target_score: payload.target_score,
            },
        )
        .await?;

    Ok(Json(json!({ "success": true, "data": { "id": id } })))
}
