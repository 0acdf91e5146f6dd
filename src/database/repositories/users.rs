use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::user::{NewUser, User, UserPatch};

use super::RepoError;

pub struct UsersRepository {
    pool: PgPool,
}

impl UsersRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a user record for an external identity, or return the existing
    /// one. Called from the identity provider's provisioning hook, which may
    /// fire more than once for the same account.
    pub async fn provision(&self, user: NewUser) -> Result<Uuid, RepoError> {
        if let Some(existing) = self.find_by_external_id(&user.external_id).await? {
            return Ok(existing.id);
        }

        let (id,): (Uuid,) = sqlx::query_as(
            "INSERT INTO users (external_id, name, email, avatar_url, target_score) \
             VALUES ($1, $2, $3, $4, $5) RETURNING id",
        )
        .bind(&user.external_id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.avatar_url)
        .bind(user.target_score)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    pub async fn find_by_external_id(&self, external_id: &str) -> Result<Option<User>, RepoError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE external_id = $1")
            .bind(external_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    /// Patch a user record by external identity. Only the supplied fields
    /// are written.
    pub async fn update_by_external_id(
        &self,
        external_id: &str,
        patch: UserPatch,
    ) -> Result<Uuid, RepoError> {
        let id: Option<(Uuid,)> = sqlx::query_as(
            "UPDATE users SET \
                name = COALESCE($2, name), \
                email = COALESCE($3, email), \
                avatar_url = COALESCE($4, avatar_url), \
                target_score = COALESCE($5, target_score), \
                updated_at = now() \
             WHERE external_id = $1 \
             RETURNING id",
        )
        .bind(external_id)
        .bind(patch.name)
        .bind(patch.email)
        .bind(patch.avatar_url)
        .bind(patch.target_score)
        .fetch_optional(&self.pool)
        .await?;

        let (id,) = id.ok_or(RepoError::NotFound("user"))?;
        Ok(id)
    }

    /// Patch the resolved caller's own profile.
    pub async fn update_profile(&self, user: &User, patch: UserPatch) -> Result<Uuid, RepoError> {
        sqlx::query(
            "UPDATE users SET \
                name = COALESCE($2, name), \
                email = COALESCE($3, email), \
                avatar_url = COALESCE($4, avatar_url), \
                target_score = COALESCE($5, target_score), \
                updated_at = now() \
             WHERE id = $1",
        )
        .bind(user.id)
        .bind(patch.name)
        .bind(patch.email)
        .bind(patch.avatar_url)
        .bind(patch.target_score)
        .execute(&self.pool)
        .await?;

        Ok(user.id)
    }
}
