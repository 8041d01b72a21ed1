use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use time::OffsetDateTime;

use crate::error::{ApiError, ApiResult};
use crate::models::event::Event;
use crate::models::user::User;

/// A user's attendance record for one event.
///
/// At most one row exists per (user, event) pair; the database constraint
/// rejects the second of two concurrent inserts rather than deduplicating.
#[derive(Clone, Debug, Serialize, sqlx::FromRow)]
pub struct Attendance {
    pub id: i64,
    pub user_id: i64,
    pub event_id: i64,
    pub status: AttendanceStatus,
    /// The admin who marked this attendance
    pub marked_by: Option<i64>,
    #[serde(with = "time::serde::rfc3339")]
    pub marked_at: OffsetDateTime,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "attendance_status", rename_all = "snake_case")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Excused,
}

impl Default for AttendanceStatus {
    fn default() -> Self {
        AttendanceStatus::Present
    }
}

impl Attendance {
    pub async fn for_user_at_event_opt(
        user_id: i64,
        event_id: i64,
        pool: &PgPool,
    ) -> ApiResult<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM attendance WHERE user_id = $1 AND event_id = $2")
            .bind(user_id)
            .bind(event_id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn for_event(event_id: i64, pool: &PgPool) -> ApiResult<Vec<Self>> {
        Event::with_id(event_id, pool).await?;

        sqlx::query_as::<_, Self>("SELECT * FROM attendance WHERE event_id = $1")
            .bind(event_id)
            .fetch_all(pool)
            .await
            .map_err(Into::into)
    }

    /// Marks a user's attendance at an event, recording who marked it.
    pub async fn mark(
        event_id: i64,
        new_attendance: NewAttendance,
        marked_by: i64,
        pool: &PgPool,
    ) -> ApiResult<Self> {
        Event::with_id(event_id, pool).await?;
        User::with_id(new_attendance.user_id, pool).await?;

        if Self::for_user_at_event_opt(new_attendance.user_id, event_id, pool)
            .await?
            .is_some()
        {
            return Err(Self::already_marked(new_attendance.user_id, event_id));
        }

        sqlx::query_as::<_, Self>(
            "INSERT INTO attendance (user_id, event_id, status, marked_by)
             VALUES ($1, $2, $3, $4)
             RETURNING *",
        )
        .bind(new_attendance.user_id)
        .bind(event_id)
        .bind(new_attendance.status)
        .bind(marked_by)
        .fetch_one(pool)
        .await
        .map_err(|err| {
            // a concurrent duplicate insert lands on the constraint instead
            if ApiError::is_unique_violation(&err) {
                Self::already_marked(new_attendance.user_id, event_id)
            } else {
                err.into()
            }
        })
    }

    fn already_marked(user_id: i64, event_id: i64) -> ApiError {
        ApiError::BadRequest(format!(
            "attendance for user {} at event {} is already marked",
            user_id, event_id
        ))
    }
}

#[derive(Debug, Deserialize)]
pub struct NewAttendance {
    pub user_id: i64,
    #[serde(default)]
    pub status: AttendanceStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_defaults_to_present() {
        let new_attendance: NewAttendance = serde_json::from_str("{\"user_id\": 3}").unwrap();
        assert_eq!(new_attendance.status, AttendanceStatus::Present);
    }

    #[test]
    fn unknown_statuses_are_rejected() {
        assert!(serde_json::from_str::<AttendanceStatus>("\"late\"").is_err());
    }
}
