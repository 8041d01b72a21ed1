use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use time::OffsetDateTime;

use crate::error::{ApiError, ApiResult};
use crate::models::user::User;

/// A unit of work assigned to a club member.
#[derive(Clone, Debug, sqlx::FromRow)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: String,
    /// The user this task is assigned to
    pub assigned_to: i64,
    pub status: TaskStatus,
    /// Points awarded upon completion. Awarding is an explicit admin
    /// operation, never automatic.
    pub points: i32,
    pub due_date: Option<OffsetDateTime>,
    /// Link to the finished work (PR, doc, etc.)
    pub submission_link: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "task_status", rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Submitted,
    Verified,
}

impl TaskStatus {
    /// The human-readable label shown in clients.
    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "Pending",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Submitted => "Submitted",
            TaskStatus::Verified => "Verified",
        }
    }
}

impl Task {
    pub async fn with_id(id: i64, pool: &PgPool) -> ApiResult<Self> {
        Self::with_id_opt(id, pool)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("no task with id {}", id)))
    }

    pub async fn with_id_opt(id: i64, pool: &PgPool) -> ApiResult<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM tasks WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn for_user(user_id: i64, pool: &PgPool) -> ApiResult<Vec<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM tasks WHERE assigned_to = $1")
            .bind(user_id)
            .fetch_all(pool)
            .await
            .map_err(Into::into)
    }

    /// The user's tasks currently being worked on.
    pub async fn active_for_user(user_id: i64, pool: &PgPool) -> ApiResult<Vec<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM tasks WHERE assigned_to = $1 AND status = $2")
            .bind(user_id)
            .bind(TaskStatus::InProgress)
            .fetch_all(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn create(new_task: NewTask, pool: &PgPool) -> ApiResult<Self> {
        User::with_id(new_task.assigned_to, pool).await?;

        sqlx::query_as::<_, Self>(
            "INSERT INTO tasks (title, description, assigned_to, points, due_date)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING *",
        )
        .bind(&new_task.title)
        .bind(&new_task.description)
        .bind(new_task.assigned_to)
        .bind(new_task.points)
        .bind(new_task.due_date)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Applies the provided fields, leaving the rest untouched.
    pub async fn update(id: i64, update: TaskUpdate, pool: &PgPool) -> ApiResult<Self> {
        Self::with_id(id, pool).await?;

        sqlx::query_as::<_, Self>(
            "UPDATE tasks SET
                 title = COALESCE($1, title),
                 description = COALESCE($2, description),
                 status = COALESCE($3, status),
                 points = COALESCE($4, points),
                 due_date = COALESCE($5, due_date),
                 submission_link = COALESCE($6, submission_link),
                 updated_at = now()
             WHERE id = $7
             RETURNING *",
        )
        .bind(&update.title)
        .bind(&update.description)
        .bind(update.status)
        .bind(update.points)
        .bind(update.due_date)
        .bind(&update.submission_link)
        .bind(id)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn delete(id: i64, pool: &PgPool) -> ApiResult<()> {
        Self::with_id(id, pool).await?;

        sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(())
    }
}

/// The wire shape of a task, including the human-readable status label.
#[derive(Debug, Serialize)]
pub struct TaskResponse {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub status_display: &'static str,
    pub points: i32,
    #[serde(with = "time::serde::rfc3339::option")]
    pub due_date: Option<OffsetDateTime>,
    pub submission_link: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        TaskResponse {
            id: task.id,
            title: task.title,
            description: task.description,
            status: task.status,
            status_display: task.status.label(),
            points: task.points,
            due_date: task.due_date,
            submission_link: task.submission_link,
            created_at: task.created_at,
        }
    }
}

fn default_task_points() -> i32 {
    10
}

#[derive(Debug, Deserialize)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub assigned_to: i64,
    #[serde(default = "default_task_points")]
    pub points: i32,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub due_date: Option<OffsetDateTime>,
}

#[derive(Debug, Deserialize)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub points: Option<i32>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub due_date: Option<OffsetDateTime>,
    pub submission_link: Option<String>,
}

impl TaskUpdate {
    /// Whether the update only moves the task along the assignee's own
    /// workflow (status and submission link, never verification).
    pub fn is_self_serve(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.points.is_none()
            && self.due_date.is_none()
            && self.status != Some(TaskStatus::Verified)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::mock::mock_task;

    #[test]
    fn status_labels_are_human_readable() {
        assert_eq!(TaskStatus::Pending.label(), "Pending");
        assert_eq!(TaskStatus::InProgress.label(), "In Progress");
        assert_eq!(TaskStatus::Submitted.label(), "Submitted");
        assert_eq!(TaskStatus::Verified.label(), "Verified");
    }

    #[test]
    fn response_includes_status_display() {
        let mut task = mock_task();
        task.status = TaskStatus::InProgress;

        let json = serde_json::to_value(TaskResponse::from(task)).unwrap();
        assert_eq!(json["status"], serde_json::json!("in_progress"));
        assert_eq!(json["status_display"], serde_json::json!("In Progress"));
    }

    #[test]
    fn new_tasks_default_to_ten_points() {
        let new_task: NewTask = serde_json::from_str(
            "{\"title\": \"Fix the site\", \"description\": \"CSS is broken\", \"assigned_to\": 1}",
        )
        .unwrap();

        assert_eq!(new_task.points, 10);
        assert!(new_task.due_date.is_none());
    }

    #[test]
    fn unknown_statuses_are_rejected() {
        assert!(serde_json::from_str::<TaskStatus>("\"later\"").is_err());
    }

    #[test]
    fn verification_is_not_self_serve() {
        let submit: TaskUpdate = serde_json::from_str(
            "{\"status\": \"submitted\", \"submission_link\": \"https://github.com/org/repo/pull/7\"}",
        )
        .unwrap();
        assert!(submit.is_self_serve());

        let verify: TaskUpdate = serde_json::from_str("{\"status\": \"verified\"}").unwrap();
        assert!(!verify.is_self_serve());

        let retitle: TaskUpdate = serde_json::from_str("{\"title\": \"New title\"}").unwrap();
        assert!(!retitle.is_self_serve());
    }
}
