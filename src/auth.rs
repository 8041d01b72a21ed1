//! Resolving requests to logged-in users.

use axum::extract::{Extension, FromRequest, RequestParts};
use axum::http::HeaderMap;
use sqlx::PgPool;

use crate::error::{ApiError, ApiResult};
use crate::models::user::User;

/// The header clients send their API token in.
pub const TOKEN_HEADER: &str = "PORTAL_TOKEN";

pub fn get_token(headers: &HeaderMap) -> ApiResult<Option<&str>> {
    headers
        .iter()
        .find_map(|(name, value)| {
            if name == TOKEN_HEADER {
                Some(value.to_str().map_err(|_err| {
                    ApiError::BadRequest("token header is not valid UTF-8".to_owned())
                }))
            } else {
                None
            }
        })
        .transpose()
}

/// A logged-in user, resolved from the token header.
///
/// Rejects the request with an authorization error before the handler
/// runs when no valid session is attached.
pub struct AuthenticatedUser(pub User);

#[async_trait::async_trait]
impl<B: Send> FromRequest<B> for AuthenticatedUser {
    type Rejection = ApiError;

    async fn from_request(req: &mut RequestParts<B>) -> Result<Self, Self::Rejection> {
        let Extension(pool) = Extension::<PgPool>::from_request(req)
            .await
            .map_err(|err| ApiError::ServerError(err.to_string()))?;

        let token = get_token(req.headers())?.ok_or(ApiError::Unauthorized)?;
        let user = User::with_token(token, &pool).await?;

        Ok(AuthenticatedUser(user))
    }
}

/// A logged-in club admin.
pub struct AdminUser(pub User);

#[async_trait::async_trait]
impl<B: Send> FromRequest<B> for AdminUser {
    type Rejection = ApiError;

    async fn from_request(req: &mut RequestParts<B>) -> Result<Self, Self::Rejection> {
        let AuthenticatedUser(user) = AuthenticatedUser::from_request(req).await?;

        if user.is_club_admin {
            Ok(AdminUser(user))
        } else {
            Err(ApiError::Forbidden)
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn finds_the_token_header_case_insensitively() {
        let mut headers = HeaderMap::new();
        headers.insert("portal_token", HeaderValue::from_static("some-token"));

        assert_eq!(get_token(&headers).unwrap(), Some("some-token"));
    }

    #[test]
    fn missing_token_header_is_none() {
        let headers = HeaderMap::new();
        assert_eq!(get_token(&headers).unwrap(), None);
    }

    #[test]
    fn non_utf8_token_is_a_bad_request() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "portal_token",
            HeaderValue::from_bytes(&[0xfe, 0xff]).unwrap(),
        );

        assert!(get_token(&headers).is_err());
    }
}
