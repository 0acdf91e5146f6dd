use axum::{
    extract::{Extension, Path, Query},
    response::Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::database::manager::DatabaseManager;
use crate::database::models::flashcard::{FlashcardDeckPatch, NewFlashcardDeck};
use crate::database::repositories::flashcards::FlashcardsRepository;
use crate::error::ApiError;
use crate::handlers::require_present;
use crate::middleware::resolve_user::CurrentUser;

async fn repo() -> Result<FlashcardsRepository, ApiError> {
    Ok(FlashcardsRepository::new(DatabaseManager::pool().await?))
}

#[derive(Debug, Deserialize)]
pub struct DeckListQuery {
    pub subject_id: Option<Uuid>,
}

/// GET /api/decks
pub async fn list(
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Query(query): Query<DeckListQuery>,
) -> Result<Json<Value>, ApiError> {
    let repo = repo().await?;
    let decks = match query.subject_id {
        Some(subject_id) => repo.list_decks_by_subject(&user, subject_id).await?,
        None => repo.list_decks(&user).await?,
    };
    Ok(Json(json!({ "success": true, "data": decks })))
}

#[derive(Debug, Deserialize)]
pub struct CreateDeckRequest {
    pub name: String,
    pub subject_id: Uuid,
}

/// POST /api/decks
pub async fn create(
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(payload): Json<CreateDeckRequest>,
) -> Result<Json<Value>, ApiError> {
    require_present("name", &payload.name)?;

    let id = repo()
        .await?
        .create_deck(
            &user,
            NewFlashcardDeck {
                name: payload.name,
                subject_id: payload.subject_id,
            },
        )
        .await?;

    Ok(Json(json!({ "success": true, "data": { "id": id } })))
}

/// GET /api/decks/:id
pub async fn get(
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let deck = repo().await?.get_deck(&user, id).await?;
    Ok(Json(json!({ "success": true, "data": deck })))
}

#[derive(Debug, Deserialize)]
pub struct UpdateDeckRequest {
    pub name: Option<String>,
}

/// PATCH /api/decks/:id
pub async fn update(
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateDeckRequest>,
) -> Result<Json<Value>, ApiError> {
    let id = repo()
        .await?
        .update_deck(&user, id, FlashcardDeckPatch { name: payload.name })
        .await?;
    Ok(Json(json!({ "success": true, "data": { "id": id } })))
}

/// DELETE /api/decks/:id - removes the deck and every card in it
pub async fn delete(
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let id = repo().await?.delete_deck(&user, id).await?;
    Ok(Json(json!({ "success": true, "data": { "id": id } })))
}
