pub mod flashcards;
pub mod subjects;
pub mod tasks;
pub mod users;

use thiserror::Error;

/// Errors from the entity repositories.
///
/// `NotFound` and `NotOwner` are deliberately separate variants: existence
/// is checked before ownership, and callers surface them as different
/// failure kinds.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0} belongs to another user")]
    NotOwner(&'static str),

    #[error("{field}: {message}")]
    InvalidReference {
        field: &'static str,
        message: String,
    },

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}
