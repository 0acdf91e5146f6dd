use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgRow, FromRow, Row};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::InvalidLiteral;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubjectStatus {
    Strong,
    Pending,
    Weak,
    Completed,
}

impl SubjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubjectStatus::Strong => "strong",
            SubjectStatus::Pending => "pending",
            SubjectStatus::Weak => "weak",
            SubjectStatus::Completed => "completed",
        }
    }
}

impl FromStr for SubjectStatus {
    type Err = InvalidLiteral;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "strong" => Ok(SubjectStatus::Strong),
            "pending" => Ok(SubjectStatus::Pending),
            "weak" => Ok(SubjectStatus::Weak),
            "completed" => Ok(SubjectStatus::Completed),
            other => Err(InvalidLiteral {
                value: other.to_string(),
                expected: "strong, pending, weak, completed",
            }),
        }
    }
}

impl fmt::Display for SubjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Subject {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub progress: i32,
    pub status: SubjectStatus,
    pub weightage: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<'r> FromRow<'r, PgRow> for Subject {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let status: String = row.try_get("status")?;
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            name: row.try_get("name")?,
            progress: row.try_get("progress")?,
            status: status.parse().map_err(|e: InvalidLiteral| sqlx::Error::ColumnDecode {
                index: "status".into(),
                source: Box::new(e),
            })?,
            weightage: row.try_get("weightage")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct NewSubject {
    pub name: String,
    pub progress: i32,
    pub status: SubjectStatus,
    pub weightage: i32,
}

#[derive(Debug, Clone, Default)]
pub struct SubjectPatch {
    pub name: Option<String>,
    pub progress: Option<i32>,
    pub status: Option<SubjectStatus>,
    pub weightage: Option<i32>,
}
