use axum::extract::Extension;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::auth::AuthenticatedUser;
use crate::error::ApiResult;
use crate::models::user::session::Session;
use crate::models::user::{NewUser, User};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

pub async fn register(
    Extension(pool): Extension<PgPool>,
    Json(new_user): Json<NewUser>,
) -> ApiResult<(StatusCode, Json<TokenResponse>)> {
    let user = User::register(new_user, &pool).await?;
    let token = Session::get_or_generate_token(user.id, &pool).await?;

    tracing::info!(username = %user.username, "new user registered");

    Ok((StatusCode::CREATED, Json(TokenResponse { token })))
}

pub async fn login(
    Extension(pool): Extension<PgPool>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<Json<TokenResponse>> {
    let user = User::login(&request.email, &request.password, &pool).await?;
    let token = Session::get_or_generate_token(user.id, &pool).await?;

    Ok(Json(TokenResponse { token }))
}

pub async fn logout(
    AuthenticatedUser(user): AuthenticatedUser,
    Extension(pool): Extension<PgPool>,
) -> ApiResult<StatusCode> {
    Session::remove(user.id, &pool).await?;

    Ok(StatusCode::NO_CONTENT)
}
