pub mod flashcard;
pub mod subject;
pub mod task;
pub mod user;

use thiserror::Error;

/// Raised when a literal-set field is given a value outside its declared set.
#[derive(Debug, Clone, Error)]
#[error("unsupported value '{value}' (expected one of: {expected})")]
pub struct InvalidLiteral {
    pub value: String,
    pub expected: &'static str,
}
