use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Internal user record. `external_id` is the identity provider's stable
/// subject string; exactly one record exists per external identity.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub external_id: String,
    pub name: String,
    pub email: String,
    pub avatar_url: Option<String>,
    pub target_score: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub external_id: String,
    pub name: String,
    pub email: String,
    pub avatar_url: Option<String>,
    pub target_score: Option<f64>,
}

/// Partial update: only fields present are written, the rest stay untouched.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub avatar_url: Option<String>,
    pub target_score: Option<f64>,
}
