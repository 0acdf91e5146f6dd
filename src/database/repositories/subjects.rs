use sqlx::PgPool;
use uuid::Uuid;

use crate::database::guard::ensure_owned;
use crate::database::models::subject::{NewSubject, Subject, SubjectPatch, SubjectStatus};
use crate::database::models::user::User;

use super::RepoError;

pub struct SubjectsRepository {
    pool: PgPool,
}

impl SubjectsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, user: &User, subject: NewSubject) -> Result<Uuid, RepoError> {
        let (id,): (Uuid,) = sqlx::query_as(
            "INSERT INTO subjects (user_id, name, progress, status, weightage) \
             VALUES ($1, $2, $3, $4, $5) RETURNING id",
        )
        .bind(user.id)
        .bind(&subject.name)
        .bind(subject.progress)
        .bind(subject.status.as_str())
        .bind(subject.weightage)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    pub async fn list(&self, user: &User) -> Result<Vec<Subject>, RepoError> {
        let subjects = sqlx::query_as::<_, Subject>(
            "SELECT * FROM subjects WHERE user_id = $1 ORDER BY created_at",
        )
        .bind(user.id)
        .fetch_all(&self.pool)
        .await?;
        Ok(subjects)
    }

    /// Fetch a single subject by id: existence first, then ownership.
    pub async fn get(&self, user: &User, id: Uuid) -> Result<Subject, RepoError> {
        let subject = sqlx::query_as::<_, Subject>("SELECT * FROM subjects WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(RepoError::NotFound("subject"))?;
        ensure_owned("subject", subject.user_id, user)?;
        Ok(subject)
    }

    pub async fn update(&self, user: &User, id: Uuid, patch: SubjectPatch) -> Result<Uuid, RepoError> {
        self.get(user, id).await?;

        sqlx::query(
            "UPDATE subjects SET \
                name = COALESCE($2, name), \
                progress = COALESCE($3, progress), \
                status = COALESCE($4, status), \
                weightage = COALESCE($5, weightage), \
                updated_at = now() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(patch.name)
        .bind(patch.progress)
        .bind(patch.status.map(|s| s.as_str()))
        .bind(patch.weightage)
        .execute(&self.pool)
        .await?;

        Ok(id)
    }

    pub async fn set_progress(
        &self,
        user: &User,
        id: Uuid,
        progress: i32,
        status: Option<SubjectStatus>,
    ) -> Result<Uuid, RepoError> {
        self.update(
            user,
            id,
            SubjectPatch {
                progress: Some(progress),
                status,
                ..Default::default()
            },
        )
        .await
    }

    /// Delete a subject. Dependent tasks and decks are NOT cascaded; they
    /// keep their subject_id and are left in place.
    pub async fn delete(&self, user: &User, id: Uuid) -> Result<Uuid, RepoError> {
        self.get(user, id).await?;

        sqlx::query("DELETE FROM subjects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        let (tasks,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tasks WHERE subject_id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        let (decks,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM flashcard_decks WHERE subject_id = $1")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        if tasks > 0 || decks > 0 {
            tracing::warn!(
                "subject {} deleted with {} tasks and {} decks still referencing it",
                id,
                tasks,
                decks
            );
        }

        Ok(id)
    }
}
