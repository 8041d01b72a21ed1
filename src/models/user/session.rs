use sqlx::PgPool;
use uuid::Uuid;

use crate::error::ApiResult;
use crate::models::user::User;

/// A login session tying an API token to a user.
#[derive(Debug, sqlx::FromRow)]
pub struct Session {
    pub key: String,
    pub user_id: i64,
}

impl Session {
    pub async fn with_token_opt(token: &str, pool: &PgPool) -> ApiResult<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM sessions WHERE key = $1")
            .bind(token)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Returns the user's current token, generating one if they have none.
    pub async fn get_or_generate_token(user_id: i64, pool: &PgPool) -> ApiResult<String> {
        User::with_id(user_id, pool).await?; // ensure that the user exists

        let session = sqlx::query_scalar::<_, String>(
            "SELECT key FROM sessions WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
        if let Some(session_key) = session {
            return Ok(session_key);
        }

        let token = Uuid::new_v4().to_string();
        sqlx::query("INSERT INTO sessions (key, user_id) VALUES ($1, $2)")
            .bind(&token)
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(token)
    }

    pub async fn remove(user_id: i64, pool: &PgPool) -> ApiResult<()> {
        sqlx::query("DELETE FROM sessions WHERE user_id = $1")
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(())
    }
}
