use axum::extract::{Extension, Path, Query};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use sqlx::PgPool;

use crate::auth::{AdminUser, AuthenticatedUser};
use crate::error::{ApiError, ApiResult};
use crate::models::task::{NewTask, Task, TaskResponse, TaskUpdate};

#[derive(Debug, Deserialize)]
pub struct TaskFilter {
    /// Another user's id; only club admins may read other users' tasks
    pub user: Option<i64>,
}

pub async fn all_tasks(
    AuthenticatedUser(user): AuthenticatedUser,
    Query(filter): Query<TaskFilter>,
    Extension(pool): Extension<PgPool>,
) -> ApiResult<Json<Vec<TaskResponse>>> {
    let user_id = match filter.user {
        Some(other) if other != user.id => {
            if !user.is_club_admin {
                return Err(ApiError::Forbidden);
            }
            other
        }
        _ => user.id,
    };

    let tasks = Task::for_user(user_id, &pool).await?;

    Ok(Json(tasks.into_iter().map(TaskResponse::from).collect()))
}

pub async fn get_task(
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<i64>,
    Extension(pool): Extension<PgPool>,
) -> ApiResult<Json<TaskResponse>> {
    let task = Task::with_id(id, &pool).await?;
    if task.assigned_to != user.id && !user.is_club_admin {
        return Err(ApiError::Forbidden);
    }

    Ok(Json(TaskResponse::from(task)))
}

pub async fn create_task(
    AdminUser(_admin): AdminUser,
    Extension(pool): Extension<PgPool>,
    Json(new_task): Json<NewTask>,
) -> ApiResult<(StatusCode, Json<TaskResponse>)> {
    let task = Task::create(new_task, &pool).await?;

    Ok((StatusCode::CREATED, Json(TaskResponse::from(task))))
}

/// Assignees may move their own task along and attach a submission link;
/// everything else, verification included, requires a club admin.
pub async fn update_task(
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<i64>,
    Extension(pool): Extension<PgPool>,
    Json(update): Json<TaskUpdate>,
) -> ApiResult<Json<TaskResponse>> {
    let task = Task::with_id(id, &pool).await?;
    if !user.is_club_admin && (task.assigned_to != user.id || !update.is_self_serve()) {
        return Err(ApiError::Forbidden);
    }

    let task = Task::update(id, update, &pool).await?;

    Ok(Json(TaskResponse::from(task)))
}

pub async fn delete_task(
    AdminUser(_admin): AdminUser,
    Path(id): Path<i64>,
    Extension(pool): Extension<PgPool>,
) -> ApiResult<StatusCode> {
    Task::delete(id, &pool).await?;

    Ok(StatusCode::NO_CONTENT)
}
