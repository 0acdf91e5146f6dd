use axum::{
    extract::{Extension, Path, Query},
    response::Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::database::manager::DatabaseManager;
use crate::database::models::flashcard::{FlashcardPatch, MasteryLevel, NewFlashcard};
use crate::database::repositories::flashcards::FlashcardsRepository;
use crate::error::ApiError;
use crate::handlers::{parse_field, require_present};
use crate::middleware::resolve_user::CurrentUser;

async fn repo() -> Result<FlashcardsRepository, ApiError> {
    Ok(FlashcardsRepository::new(DatabaseManager::pool().await?))
}

#[derive(Debug, Deserialize)]
pub struct CardListQuery {
    pub mastery_level: Option<String>,
}

/// GET /api/decks/:id/cards
pub async fn list(
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(deck_id): Path<Uuid>,
    Query(query): Query<CardListQuery>,
) -> Result<Json<Value>, ApiError> {
    let repo = repo().await?;
    let cards = match query.mastery_level.as_deref() {
        Some(level) => {
            let level: MasteryLevel = parse_field("mastery_level", level)?;
            repo.list_cards_by_mastery(&user, deck_id, level).await?
        }
        None => repo.list_cards(&user, deck_id).await?,
    };
    Ok(Json(json!({ "success": true, "data": cards })))
}

#[derive(Debug, Deserialize)]
pub struct CreateCardRequest {
    pub front: String,
    pub back: String,
    pub mastery_level: String,
}

/// POST /api/decks/:id/cards
pub async fn create(
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(deck_id): Path<Uuid>,
    Json(payload): Json<CreateCardRequest>,
) -> Result<Json<Value>, ApiError> {
    require_present("front", &payload.front)?;
    require_present("back", &payload.back)?;
    let mastery_level: MasteryLevel = parse_field("mastery_level", &payload.mastery_level)?;

    let id = repo()
        .await?
        .create_card(
            &user,
            deck_id,
            NewFlashcard {
                front: payload.front,
                back: payload.back,
                mastery_level,
            },
        )
        .await?;

    Ok(Json(json!({ "success": true, "data": { "id": id } })))
}

/// GET /api/cards/:id
pub async fn get(
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let card = repo().await?.get_card(&user, id).await?;
    Ok(Json(json!({ "success": true, "data": card })))
}

#[derive(Debug, Deserialize)]
pub struct UpdateCardRequest {
    pub front: Option<String>,
    pub back: Option<String>,
    pub mastery_level: Option<String>,
}

/// PATCH /api/cards/:id
pub async fn update(
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCardRequest>,
) -> Result<Json<Value>, ApiError> {
    let mastery_level = payload
        .mastery_level
        .as_deref()
        .map(|s| parse_field::<MasteryLevel>("mastery_level", s))
        .transpose()?;

    let id = repo()
        .await?
        .update_card(
            &user,
            id,
            FlashcardPatch {
                front: payload.front,
                back: payload.back,
                mastery_level,
            },
        )
        .await?;

    Ok(Json(json!({ "success": true, "data": { "id": id } })))
}

/// DELETE /api/cards/:id
pub async fn delete(
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let id = repo().await?.delete_card(&user, id).await?;
    Ok(Json(json!({ "success": true, "data": { "id": id } })))
}
