use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::guard::ensure_owned;
use crate::database::models::task::{NewTask, Task, TaskPatch, TaskStatus, TaskType};
use crate::database::models::user::User;

use super::RepoError;

pub struct TasksRepository {
    pool: PgPool,
}

impl TasksRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, user: &User, task: NewTask) -> Result<Uuid, RepoError> {
        self.ensure_subject_ref(user, task.subject_id).await?;

        let (id,): (Uuid,) = sqlx::query_as(
            "INSERT INTO tasks (user_id, title, subject_id, task_type, status, priority, due_date) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING id",
        )
        .bind(user.id)
        .bind(&task.title)
        .bind(task.subject_id)
        .bind(task.task_type.as_str())
        .bind(task.status.as_str())
        .bind(task.priority.as_str())
        .bind(task.due_date)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    pub async fn list(&self, user: &User) -> Result<Vec<Task>, RepoError> {
        let tasks =
            sqlx::query_as::<_, Task>("SELECT * FROM tasks WHERE user_id = $1 ORDER BY created_at")
                .bind(user.id)
                .fetch_all(&self.pool)
                .await?;
        Ok(tasks)
    }

    /// Tasks due on an exact date, served by the (user_id, due_date) index.
    pub async fn list_by_date(&self, user: &User, date: NaiveDate) -> Result<Vec<Task>, RepoError> {
        let tasks = sqlx::query_as::<_, Task>(
            "SELECT * FROM tasks WHERE user_id = $1 AND due_date = $2 ORDER BY created_at",
        )
        .bind(user.id)
        .bind(date)
        .fetch_all(&self.pool)
        .await?;
        Ok(tasks)
    }

    /// No dedicated index; filter the owner-scoped list.
    pub async fn list_by_subject(
        &self,
        user: &User,
        subject_id: Uuid,
    ) -> Result<Vec<Task>, RepoError> {
        let tasks = self.list(user).await?;
        Ok(tasks.into_iter().filter(|t| t.subject_id == subject_id).collect())
    }

    /// No dedicated index; filter the owner-scoped list.
    pub async fn list_by_type(&self, user: &User, task_type: TaskType) -> Result<Vec<Task>, RepoError> {
        let tasks = self.list(user).await?;
        Ok(tasks.into_iter().filter(|t| t.task_type == task_type).collect())
    }

    pub async fn get(&self, user: &User, id: Uuid) -> Result<Task, RepoError> {
        let task = sqlx::query_as::<_, Task>("SELECT * FROM tasks WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(RepoError::NotFound("task"))?;
        ensure_owned("task", task.user_id, user)?;
        Ok(task)
    }

    pub async fn update(&self, user: &User, id: Uuid, patch: TaskPatch) -> Result<Uuid, RepoError> {
        self.get(user, id).await?;

        if let Some(subject_id) = patch.subject_id {
            self.ensure_subject_ref(user, subject_id).await?;
        }

        sqlx::query(
            "UPDATE tasks SET \
                title = COALESCE($2, title), \
                subject_id = COALESCE($3, subject_id), \
                task_type = COALESCE($4, task_type), \
                status = COALESCE($5, status), \
                priority = COALESCE($6, priority), \
                due_date = COALESCE($7, due_date), \
                updated_at = now() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(patch.title)
        .bind(patch.subject_id)
        .bind(patch.task_type.map(|t| t.as_str()))
        .bind(patch.status.map(|s| s.as_str()))
        .bind(patch.priority.map(|p| p.as_str()))
        .bind(patch.due_date)
        .execute(&self.pool)
        .await?;

        Ok(id)
    }

    /// Idempotent under repeated application of the same status.
    pub async fn set_status(&self, user: &User, id: Uuid, status: TaskStatus) -> Result<Uuid, RepoError> {
        self.update(
            user,
            id,
            TaskPatch {
                status: Some(status),
                ..Default::default()
            },
        )
        .await
    }

    pub async fn delete(&self, user: &User, id: Uuid) -> Result<Uuid, RepoError> {
        self.get(user, id).await?;
        sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(id)
    }

    /// A task's subject reference must point at an existing subject of the
    /// same owner. Referencing a missing subject and referencing someone
    /// else's subject fail identically.
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
