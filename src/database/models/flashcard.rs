use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgRow, FromRow, Row};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::InvalidLiteral;

/// Self-assessment tag rated by the learner on each review. Freely
/// transitionable in any direction; there is no interval scheduler behind it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MasteryLevel {
    New,
    Learning,
    Mastered,
}

impl MasteryLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            MasteryLevel::New => "new",
            MasteryLevel::Learning => "learning",
            MasteryLevel::Mastered => "mastered",
        }
    }
}

impl FromStr for MasteryLevel {
    type Err = InvalidLiteral;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(MasteryLevel::New),
            "learning" => Ok(MasteryLevel::Learning),
            "mastered" => Ok(MasteryLevel::Mastered),
            other => Err(InvalidLiteral {
                value: other.to_string(),
                expected: "new, learning, mastered",
            }),
        }
    }
}

impl fmt::Display for MasteryLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A deck belongs to a user; its flashcards belong to it transitively, so
/// ownership of the deck implies ownership of every card in it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FlashcardDeck {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub subject_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewFlashcardDeck {
    pub name: String,
    pub subject_id: Uuid,
}

#[derive(Debug, Clone, Default)]
pub struct FlashcardDeckPatch {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Flashcard {
    pub id: Uuid,
    pub deck_id: Uuid,
    pub front: String,
    pub back: String,
    pub mastery_level: MasteryLevel,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<'r> FromRow<'r, PgRow> for Flashcard {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let mastery_level: String = row.try_get("mastery_level")?;
        Ok(Self {
            id: row.try_get("id")?,
            deck_id: row.try_get("deck_id")?,
            front: row.try_get("front")?,
            back: row.try_get("back")?,
            mastery_level: mastery_level.parse().map_err(|e: InvalidLiteral| {
                sqlx::Error::ColumnDecode {
                    index: "mastery_level".into(),
                    source: Box::new(e),
                }
            })?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct NewFlashcard {
    pub front: String,
    pub back: String,
    pub mastery_level: MasteryLevel,
}

#[derive(Debug, Clone, Default)]
pub struct FlashcardPatch {
    pub front: Option<String>,
    pub back: Option<String>,
    pub mastery_level: Option<MasteryLevel>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mastery_literals_round_trip() {
        for s in ["new", "learning", "mastered"] {
            assert_eq!(s.parse::<MasteryLevel>().unwrap().as_str(), s);
        }
        assert!("expert".parse::<MasteryLevel>().is_err());
    }
}
