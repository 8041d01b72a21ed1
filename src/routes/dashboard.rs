//! The composite dashboard endpoint.
//!
//! One read-only aggregation scoped to the calling user: who they are,
//! what they are working on, and what is coming up. Safe to poll.

use axum::extract::Extension;
use axum::Json;
use serde::Serialize;
use sqlx::PgPool;

use crate::auth::AuthenticatedUser;
use crate::error::ApiResult;
use crate::models::event::{Event, EventResponse};
use crate::models::task::{Task, TaskResponse};
use crate::models::user::User;

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub user: DashboardUser,
    pub active_tasks: Vec<TaskResponse>,
    pub upcoming_events: Vec<EventResponse>,
}

/// The identity summary shown at the top of the dashboard.
#[derive(Debug, Serialize)]
pub struct DashboardUser {
    pub name: String,
    pub points: i32,
    pub batch: Option<i32>,
    pub student_id: Option<String>,
}

impl From<&User> for DashboardUser {
    fn from(user: &User) -> Self {
        DashboardUser {
            name: user.full_name(),
            points: user.points,
            batch: user.batch_year,
            student_id: user.student_id.clone(),
        }
    }
}

pub async fn dashboard(
    AuthenticatedUser(user): AuthenticatedUser,
    Extension(pool): Extension<PgPool>,
) -> ApiResult<Json<DashboardResponse>> {
    let active_tasks = Task::active_for_user(user.id, &pool).await?;
    let upcoming_events = Event::upcoming(&pool).await?;

    Ok(Json(DashboardResponse {
        user: DashboardUser::from(&user),
        active_tasks: active_tasks.into_iter().map(TaskResponse::from).collect(),
        upcoming_events: upcoming_events
            .into_iter()
            .map(EventResponse::from)
            .collect(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::mock::{mock_event, mock_task, mock_user};

    #[test]
    fn summary_uses_the_derived_full_name() {
        let mut user = mock_user();
        user.first_name = String::from("Ada");
        user.last_name = String::from("Lovelace");

        let summary = DashboardUser::from(&user);
        assert_eq!(summary.name, "Ada Lovelace");

        user.first_name = String::new();
        user.last_name = String::new();
        user.username = String::from("devjane");

        let summary = DashboardUser::from(&user);
        assert_eq!(summary.name, "devjane");
    }

    #[test]
    fn response_has_the_three_top_level_fields() {
        let user = mock_user();
        let response = DashboardResponse {
            user: DashboardUser::from(&user),
            active_tasks: vec![TaskResponse::from(mock_task())],
            upcoming_events: vec![EventResponse::from(mock_event())],
        };

        let json = serde_json::to_value(response).unwrap();
        let fields = json.as_object().unwrap();
        assert_eq!(fields.len(), 3);
        assert!(fields.contains_key("user"));
        assert!(fields.contains_key("active_tasks"));
        assert!(fields.contains_key("upcoming_events"));
    }
}
