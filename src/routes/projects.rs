use axum::extract::{Extension, Path};
use axum::http::StatusCode;
use axum::Json;
use sqlx::PgPool;

use crate::auth::{AdminUser, AuthenticatedUser};
use crate::error::ApiResult;
use crate::models::project::{NewProject, Project, ProjectResponse};

pub async fn all_projects(
    AuthenticatedUser(_user): AuthenticatedUser,
    Extension(pool): Extension<PgPool>,
) -> ApiResult<Json<Vec<ProjectResponse>>> {
    let mut responses = vec![];
    for project in Project::all(&pool).await? {
        let contributors = Project::contributors(project.id, &pool).await?;
        responses.push(project.into_response(contributors));
    }

    Ok(Json(responses))
}

pub async fn get_project(
    AuthenticatedUser(_user): AuthenticatedUser,
    Path(id): Path<i64>,
    Extension(pool): Extension<PgPool>,
) -> ApiResult<Json<ProjectResponse>> {
    let project = Project::with_id(id, &pool).await?;
    let contributors = Project::contributors(id, &pool).await?;

    Ok(Json(project.into_response(contributors)))
}

pub async fn create_project(
    AdminUser(_admin): AdminUser,
    Extension(pool): Extension<PgPool>,
    Json(new_project): Json<NewProject>,
) -> ApiResult<(StatusCode, Json<ProjectResponse>)> {
    let project = Project::create(new_project, &pool).await?;
    let contributors = Project::contributors(project.id, &pool).await?;

    Ok((StatusCode::CREATED, Json(project.into_response(contributors))))
}

pub async fn update_project(
    AdminUser(_admin): AdminUser,
    Path(id): Path<i64>,
    Extension(pool): Extension<PgPool>,
    Json(update): Json<NewProject>,
) -> ApiResult<Json<ProjectResponse>> {
    let project = Project::update(id, update, &pool).await?;
    let contributors = Project::contributors(id, &pool).await?;

    Ok(Json(project.into_response(contributors)))
}

pub async fn delete_project(
    AdminUser(_admin): AdminUser,
    Path(id): Path<i64>,
    Extension(pool): Extension<PgPool>,
) -> ApiResult<StatusCode> {
    Project::delete(id, &pool).await?;

    Ok(StatusCode::NO_CONTENT)
}
