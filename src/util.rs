//! Extra utilities for use elsewhere in the API.

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use time::OffsetDateTime;

use crate::error::{ApiError, ApiResult};

pub fn current_time() -> OffsetDateTime {
    OffsetDateTime::now_utc()
}

pub async fn connect_to_db() -> ApiResult<PgPool> {
    let db_url = std::env::var("DATABASE_URL")
        .map_err(|_err| ApiError::ServerError("No database URL provided".to_owned()))?;

    PgPoolOptions::new()
        .max_connections(5)
        .connect(&db_url)
        .await
        .map_err(Into::into)
}
