use axum::response::Json;
use serde_json::{json, Value};

use crate::analytics::revision::{revision_recommendations, weak_topics};

/// GET /api/revision/weak-topics
///
/// Placeholder analysis; see analytics::revision. Kept behind the protected
/// router so the surface is stable when a real analyzer lands.
pub async fn get_weak_topics() -> Json<Value> {
    Json(json!({ "success": true, "data": weak_topics() }))
}

/// GET /api/revision/recommendations
pub async fn get_recommendations() -> Json<Value> {
    Json(json!({ "success": true, "data": revision_recommendations() }))
}
