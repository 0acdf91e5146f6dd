use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgRow, FromRow, Row};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::InvalidLiteral;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskType {
    Theory,
    #[serde(rename = "PYQs")]
    Pyqs,
    #[serde(rename = "Mock Test")]
    MockTest,
    Revision,
}

impl TaskType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskType::Theory => "Theory",
            TaskType::Pyqs => "PYQs",
            TaskType::MockTest => "Mock Test",
            TaskType::Revision => "Revision",
        }
    }
}

impl FromStr for TaskType {
    type Err = InvalidLiteral;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Theory" => Ok(TaskType::Theory),
            "PYQs" => Ok(TaskType::Pyqs),
            "Mock Test" => Ok(TaskType::MockTest),
            "Revision" => Ok(TaskType::Revision),
            other => Err(InvalidLiteral {
                value: other.to_string(),
                expected: "Theory, PYQs, Mock Test, Revision",
            }),
        }
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Freely re-transitionable; a completed task can go back to pending or be
/// flagged for another pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    Pending,
    Completed,
    ReviseAgain,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Completed => "completed",
            TaskStatus::ReviseAgain => "revise-again",
        }
    }
}

impl FromStr for TaskStatus {
    type Err = InvalidLiteral;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TaskStatus::Pending),
            "completed" => Ok(TaskStatus::Completed),
            "revise-again" => Ok(TaskStatus::ReviseAgain),
            other => Err(InvalidLiteral {
                value: other.to_string(),
                expected: "pending, completed, revise-again",
            }),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    High,
    Medium,
    Low,
}

impl TaskPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::High => "high",
            TaskPriority::Medium => "medium",
            TaskPriority::Low => "low",
        }
    }
}

impl FromStr for TaskPriority {
    type Err = InvalidLiteral;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "high" => Ok(TaskPriority::High),
            "medium" => Ok(TaskPriority::Medium),
            "low" => Ok(TaskPriority::Low),
            other => Err(InvalidLiteral {
                value: other.to_string(),
                expected: "high, medium, low",
            }),
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Task {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub subject_id: Uuid,
    pub task_type: TaskType,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<'r> FromRow<'r, PgRow> for Task {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let task_type: String = row.try_get("task_type")?;
        let status: String = row.try_get("status")?;
        let priority: String = row.try_get("priority")?;
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            title: row.try_get("title")?,
            subject_id: row.try_get("subject_id")?,
            task_type: task_type.parse().map_err(|e: InvalidLiteral| sqlx::Error::ColumnDecode {
                index: "task_type".into(),
                source: Box::new(e),
            })?,
            status: status.parse().map_err(|e: InvalidLiteral| sqlx::Error::ColumnDecode {
                index: "status".into(),
                source: Box::new(e),
            })?,
            priority: priority.parse().map_err(|e: InvalidLiteral| sqlx::Error::ColumnDecode {
                index: "priority".into(),
                source: Box::new(e),
            })?,
            due_date: row.try_get("due_date")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub subject_id: Uuid,
    pub task_type: TaskType,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub subject_id: Option<Uuid>,
    pub task_type: Option<TaskType>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<NaiveDate>,
}
