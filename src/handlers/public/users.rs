// handlers/public/users.rs - identity-provider provisioning hooks
//
// The identity provider calls these when an account is created or its
// profile changes. They are keyed by the external identity string, not by a
// session: the caller here is the provider, not the user.

use axum::response::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::database::manager::DatabaseManager;
use crate::database::models::user::{NewUser, UserPatch};
use crate::database::repositories::users::UsersRepository;
use crate::error::ApiError;
use crate::handlers::require_present;

#[derive(Debug, Deserialize)]
pub struct ProvisionUserRequest {
    pub external_id: String,
    pub name: String,
    pub email: String,
    pub avatar_url: Option<String>,
    pub target_score: Option<f64>,
}

/// POST /hooks/users - create a user record for an external identity.
/// Repeated calls for the same identity return the existing record's id.
pub async fn provision(
    Json(payload): Json<ProvisionUserRequest>,
) -> Result<Json<Value>, ApiError> {
    require_present("external_id", &payload.external_id)?;
    require_present("name", &payload.name)?;
    require_present("email", &payload.email)?;

    let pool = DatabaseManager::pool().await?;
    let id = UsersRepository::new(pool)
        .provision(NewUser {
            external_id: payload.external_id,
            name: payload.name,
            email: payload.email,
            avatar_url: payload.avatar_url,
            target_score: payload.target_score,
        })
        .await?;

    Ok(Json(json!({ "success": true, "data": { "id": id } })))
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub external_id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub avatar_url: Option<String>,
    pub target_score: Option<f64>,
}

/// PUT /hooks/users - patch a user record by external identity.
pub async fn update(Json(payload): Json<UpdateUserRequest>) -> Result<Json<Value>, ApiError> {
    require_present("external_id", &payload.external_id)?;

    let pool = DatabaseManager::pool().await?;
    let id = UsersRepository::new(pool)
        .update_by_external_id(
            &payload.external_id,
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
