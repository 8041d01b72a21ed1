//! Error handling for the API.
//!
//! Every failure is request-scoped: each variant maps to one HTTP status
//! code and a JSON body, and no error is ever retried internally.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};
use thiserror::Error;

/// The error enum for all error handling across the API.
///
/// See each variant for its corresponding error status code.
#[derive(Debug, Error)]
pub enum ApiError {
    /// \[401\] The endpoint requires a logged-in user.
    #[error("login required")]
    Unauthorized,
    /// \[403\] The endpoint requires a club admin.
    #[error("access forbidden")]
    Forbidden,
    /// \[404\] The requested resource does not exist.
    #[error("resource not found")]
    NotFound(String),
    /// \[400\] The request to the API was malformed or failed validation.
    #[error("bad request")]
    BadRequest(String),
    /// \[500\] An error occurred while handling the request.
    #[error("server error")]
    ServerError(String),
    /// \[500\] An error occurred while interacting with the database.
    #[error("database error")]
    Db(#[from] sqlx::Error),
}

/// The return type for all endpoints.
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::ServerError(_) | ApiError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn as_response(&self) -> (StatusCode, Value) {
        let mut json_val = match self {
            ApiError::Unauthorized | ApiError::Forbidden => json!({}),
            ApiError::NotFound(reason) => json!({ "reason": reason }),
            ApiError::BadRequest(reason) => json!({ "reason": reason }),
            ApiError::ServerError(error) => json!({ "error": error }),
            ApiError::Db(error) => json!({ "error": error.to_string() }),
        };

        let status = self.status();
        json_val["statusCode"] = json!(status.as_u16());
        json_val["message"] = json!(self.to_string());

        (status, json_val)
    }

    /// Whether a database error is a unique-constraint violation
    /// (Postgres SQLSTATE 23505).
    pub fn is_unique_violation(error: &sqlx::Error) -> bool {
        matches!(
            error,
            sqlx::Error::Database(db_error)
                if db_error.code().as_deref() == Some("23505")
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status().is_server_error() {
            tracing::error!("request failed: {:?}", self);
        }

        let (status, body) = self.as_response();
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_bodies_carry_status_and_message() {
        let (status, body) = ApiError::Unauthorized.as_response();
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["statusCode"], json!(401));
        assert_eq!(body["message"], json!("login required"));

        let (status, body) =
            ApiError::BadRequest("attendance already marked".to_owned()).as_response();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["reason"], json!("attendance already marked"));
    }

    #[test]
    fn not_found_includes_reason() {
        let (status, body) = ApiError::NotFound("no event with id 42".to_owned()).as_response();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], json!("resource not found"));
        assert_eq!(body["reason"], json!("no event with id 42"));
    }
}
