use sqlx::PgPool;
use uuid::Uuid;

use crate::database::guard::ensure_owned;
use crate::database::models::flashcard::{
    Flashcard, FlashcardDeck, FlashcardDeckPatch, FlashcardPatch, MasteryLevel, NewFlashcard,
    NewFlashcardDeck,
};
use crate::database::models::user::User;

use super::RepoError;

/// Decks and their flashcards. Cards are owned through their deck, so every
/// card operation resolves the deck's owner before touching the card.
pub struct FlashcardsRepository {
    pool: PgPool,
}

impl FlashcardsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Deck operations

    pub async fn create_deck(&self, user: &User, deck: NewFlashcardDeck) -> Result<Uuid, RepoError> {
        self.ensure_subject_ref(user, deck.subject_id).await?;

        let (id,): (Uuid,) = sqlx::query_as(
            "INSERT INTO flashcard_decks (user_id, name, subject_id) \
             VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(user.id)
        .bind(&deck.name)
        .bind(deck.subject_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    pub async fn list_decks(&self, user: &User) -> Result<Vec<FlashcardDeck>, RepoError> {
        let decks = sqlx::query_as::<_, FlashcardDeck>(
            "SELECT * FROM flashcard_decks WHERE user_id = $1 ORDER BY created_at",
        )
        .bind(user.id)
        .fetch_all(&self.pool)
        .await?;
        Ok(decks)
    }

    pub async fn list_decks_by_subject(
        &self,
        user: &User,
        subject_id: Uuid,
    ) -> Result<Vec<FlashcardDeck>, RepoError> {
        let decks = sqlx::query_as::<_, FlashcardDeck>(
            "SELECT * FROM flashcard_decks WHERE user_id = $1 AND subject_id = $2 \
             ORDER BY created_at",
        )
        .bind(user.id)
        .bind(subject_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(decks)
    }

    pub async fn get_deck(&self, user: &User, id: Uuid) -> Result<FlashcardDeck, RepoError> {
        let deck = sqlx::query_as::<_, FlashcardDeck>("SELECT * FROM flashcard_decks WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(RepoError::NotFound("flashcard deck"))?;
        ensure_owned("flashcard deck", deck.user_id, user)?;
        Ok(deck)
    }

    pub async fn update_deck(
        &self,
        user: &User,
        id: Uuid,
        patch: FlashcardDeckPatch,
    ) -> Result<Uuid, RepoError> {
        self.get_deck(user, id).await?;

        sqlx::query(
            "UPDATE flashcard_decks SET name = COALESCE($2, name), updated_at = now() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(patch.name)
        .execute(&self.pool)
        .await?;

        Ok(id)
    }

    /// Delete a deck and every card in it: children first, then the deck,
    /// in one transaction so an interrupted cascade cannot leave cards
    /// pointing at a missing deck.
    pub async fn delete_deck(&self, user: &User, id: Uuid) -> Result<Uuid, RepoError> {
        self.get_deck(user, id).await?;

        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM flashcards WHERE deck_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM flashcard_decks WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        Ok(id)
    }

    // Card operations

    pub async fn create_card(
        &self,
        user: &User,
        deck_id: Uuid,
        card: NewFlashcard,
    ) -> Result<Uuid, RepoError> {
        self.get_deck(user, deck_id).await?;

        let (id,): (Uuid,) = sqlx::query_as(
            "INSERT INTO flashcards (deck_id, front, back, mastery_level) \
             VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(deck_id)
        .bind(&card.front)
        .bind(&card.back)
        .bind(card.mastery_level.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    pub async fn list_cards(&self, user: &User, deck_id: Uuid) -> Result<Vec<Flashcard>, RepoError> {
        self.get_deck(user, deck_id).await?;

        let cards = sqlx::query_as::<_, Flashcard>(
            "SELECT * FROM flashcards WHERE deck_id = $1 ORDER BY created_at",
        )
        .bind(deck_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(cards)
    }

    /// No dedicated index; filter the deck-scoped list.
    pub async fn list_cards_by_mastery(
        &self,
        user: &User,
        deck_id: Uuid,
        mastery_level: MasteryLevel,
    ) -> Result<Vec<Flashcard>, RepoError> {
        let cards = self.list_cards(user, deck_id).await?;
        Ok(cards
            .into_iter()
            .filter(|c| c.mastery_level == mastery_level)
            .collect())
    }

    pub async fn get_card(&self, user: &User, id: Uuid) -> Result<Flashcard, RepoError> {
        let card = sqlx::query_as::<_, Flashcard>("SELECT * FROM flashcards WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(RepoError::NotFound("flashcard"))?;

        let owner: Option<(Uuid,)> =
            sqlx::query_as("SELECT user_id FROM flashcard_decks WHERE id = $1")
                .bind(card.deck_id)
                .fetch_optional(&self.pool)
                .await?;
        let (owner_id,) = owner.ok_or(RepoError::NotFound("flashcard deck"))?;
        ensure_owned("flashcard", owner_id, user)?;

        Ok(card)
    }

    pub async fn update_card(
        &self,
        user: &User,
        id: Uuid,
        patch: FlashcardPatch,
    ) -> Result<Uuid, RepoError> {
        self.get_card(user, id).await?;

        sqlx::query(
            "UPDATE flashcards SET \
                front = COALESCE($2, front), \
                back = COALESCE($3, back), \
                mastery_level = COALESCE($4, mastery_level), \
                updated_at = now() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(patch.front)
        .bind(patch.back)
        .bind(patch.mastery_level.map(|m| m.as_str()))
        .execute(&self.pool)
        .await?;

        Ok(id)
    }

    pub async fn delete_card(&self, user: &User, id: Uuid) -> Result<Uuid, RepoError> {
        self.get_card(user, id).await?;
        sqlx::query("DELETE FROM flashcards WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(id)
    }

    /// A deck's subject reference must point at an existing subject of the
    /// same owner.
    async fn ensure_subject_ref(&self, user: &User, subject_id: Uuid) -> Result<(), RepoError> {
        let owner: Option<(Uuid,)> = sqlx::query_as("SELECT user_id FROM subjects WHERE id = $1")
            .bind(subject_id)
            .fetch_optional(&self.pool)
            .await?;

        match owner {
            Some((owner_id,)) if owner_id == user.id => Ok(()),
            _ => Err(RepoError::InvalidReference {
                field: "subject_id",
                message: "subject does not exist for this user".to_string(),
            }),
        }
    }
}
