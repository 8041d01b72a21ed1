use axum::extract::{Extension, Path};
use axum::Json;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::auth::{AdminUser, AuthenticatedUser};
use crate::error::ApiResult;
use crate::models::user::{Profile, ProfileUpdate, User};

pub async fn profile(AuthenticatedUser(user): AuthenticatedUser) -> Json<Profile> {
    Json(user.profile())
}

pub async fn update_profile(
    AuthenticatedUser(user): AuthenticatedUser,
    Extension(pool): Extension<PgPool>,
    Json(update): Json<ProfileUpdate>,
) -> ApiResult<Json<Profile>> {
    let updated = User::update_profile(user.id, update, &pool).await?;

    Ok(Json(updated.profile()))
}

pub async fn all_users(
    AdminUser(_admin): AdminUser,
    Extension(pool): Extension<PgPool>,
) -> ApiResult<Json<Vec<Profile>>> {
    let users = User::all(&pool).await?;

    Ok(Json(users.iter().map(User::profile).collect()))
}

#[derive(Debug, Deserialize)]
pub struct PointAdjustment {
    pub delta: i32,
}

#[derive(Debug, Serialize)]
pub struct PointsResponse {
    pub points: i32,
}

/// The explicit point-awarding operation; nothing else mutates points.
pub async fn adjust_points(
    AdminUser(admin): AdminUser,
    Path(id): Path<i64>,
    Extension(pool): Extension<PgPool>,
    Json(adjustment): Json<PointAdjustment>,
) -> ApiResult<Json<PointsResponse>> {
    let points = User::adjust_points(id, adjustment.delta, &pool).await?;

    tracing::info!(
        user = id,
        delta = adjustment.delta,
        admin = admin.id,
        "points adjusted"
    );

    Ok(Json(PointsResponse { points }))
}
