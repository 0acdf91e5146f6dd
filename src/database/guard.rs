use uuid::Uuid;

use super::models::user::User;
use super::repositories::RepoError;

/// Ownership guard: confirm that a fetched record's owning-user reference
/// matches the resolved caller.
///
/// Existence is the caller's concern and must be checked first (a missing
/// record is `NotFound`, never `NotOwner`), so the two failures stay
/// distinguishable.
pub fn ensure_owned(kind: &'static str, owner_id: Uuid, user: &User) -> Result<(), RepoError> {
    if owner_id != user.id {
        tracing::warn!(
            "ownership check failed: {} owned by {} requested by {}",
            kind,
            owner_id,
            user.id
        );
        return Err(RepoError::NotOwner(kind));
    }
    Ok(())
}
