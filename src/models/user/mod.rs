use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use time::OffsetDateTime;

use crate::error::{ApiError, ApiResult};
use crate::models::user::session::Session;

pub mod session;

/// A registered user of the portal.
///
/// The root identity entity: projects, events, tasks, and attendance all
/// reference users, but nothing owns a user's lifecycle. Users are never
/// hard-deleted in normal operation.
#[derive(Clone, Debug, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    /// The user's login name, which must be unique
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// The bcrypt hash of the user's password (empty for OAuth-only accounts)
    pub pass_hash: String,
    /// A short biography written by the user
    pub bio: Option<String>,
    /// A reference to a profile picture in the object store
    pub avatar: Option<String>,
    /// Student ID / roll number
    pub student_id: Option<String>,
    /// Graduation year (e.g. 2025)
    pub batch_year: Option<i32>,
    /// Gamification points for the leaderboard
    pub points: i32,
    pub github_username: Option<String>,
    /// Technical skills, e.g. ["Rust", "Postgres"]
    pub tech_skills: Vec<String>,
    pub skill_level: Option<SkillLevel>,
    pub portfolio_url: Option<String>,
    pub linkedin_url: Option<String>,
    /// Which authentication provider the account came from
    pub provider: Option<AuthProvider>,
    /// The provider's own ID for this account
    pub provider_id: Option<String>,
    pub github_id: Option<String>,
    /// Whether the user is a club member
    pub is_member: bool,
    /// Whether the user administers the club
    pub is_club_admin: bool,
    pub is_staff: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// A user's self-reported developer skill level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "skill_level", rename_all = "snake_case")]
pub enum SkillLevel {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

/// Where a user's credentials live.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "auth_provider", rename_all = "snake_case")]
pub enum AuthProvider {
    Github,
    Google,
    Local,
}

impl User {
    /// The user's full name, falling back to their username when
    /// both name fields are empty.
    pub fn full_name(&self) -> String {
        let full_name = format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_owned();

        if full_name.is_empty() {
            self.username.clone()
        } else {
            full_name
        }
    }

    /// The public projection of this user.
    ///
    /// Never exposes the password hash or the OAuth bookkeeping fields
    /// (`provider`, `provider_id`, `github_id`).
    pub fn profile(&self) -> Profile {
        Profile {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            student_id: self.student_id.clone(),
            batch_year: self.batch_year,
            points: self.points,
            is_member: self.is_member,
            is_club_admin: self.is_club_admin,
            is_staff: self.is_staff,
            avatar: self.avatar.clone(),
            bio: self.bio.clone(),
            github_username: self.github_username.clone(),
            linkedin_url: self.linkedin_url.clone(),
            portfolio_url: self.portfolio_url.clone(),
            tech_skills: self.tech_skills.clone(),
            skill_level: self.skill_level,
        }
    }

    pub async fn with_id(id: i64, pool: &PgPool) -> ApiResult<Self> {
        Self::with_id_opt(id, pool)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("no user with id {}", id)))
    }

    pub async fn with_id_opt(id: i64, pool: &PgPool) -> ApiResult<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn with_email_opt(email: &str, pool: &PgPool) -> ApiResult<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn with_username_opt(username: &str, pool: &PgPool) -> ApiResult<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Resolves an API token to the user holding the session.
    pub async fn with_token(token: &str, pool: &PgPool) -> ApiResult<Self> {
        let session = Session::with_token_opt(token, pool)
            .await?
            .ok_or(ApiError::Unauthorized)?;

        Self::with_id(session.user_id, pool).await
    }

    pub async fn all(pool: &PgPool) -> ApiResult<Vec<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM users ORDER BY created_at DESC")
            .fetch_all(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn register(new_user: NewUser, pool: &PgPool) -> ApiResult<Self> {
        if Self::with_username_opt(&new_user.username, pool)
            .await?
            .is_some()
        {
            return Err(ApiError::BadRequest(format!(
                "another user already has the username {}",
                new_user.username
            )));
        }
        if Self::with_email_opt(&new_user.email, pool).await?.is_some() {
            return Err(ApiError::BadRequest(format!(
                "another user already has the email {}",
                new_user.email
            )));
        }

        let pass_hash = bcrypt::hash(&new_user.password, 10)
            .map_err(|err| ApiError::ServerError(format!("failed to hash password: {}", err)))?;

        sqlx::query_as::<_, Self>(
            "INSERT INTO users
                 (username, email, first_name, last_name, pass_hash,
                  student_id, batch_year, provider)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING *",
        )
        .bind(&new_user.username)
        .bind(&new_user.email)
        .bind(&new_user.first_name)
        .bind(&new_user.last_name)
        .bind(&pass_hash)
        .bind(&new_user.student_id)
        .bind(new_user.batch_year)
        .bind(AuthProvider::Local)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Verifies a password login, returning the user on success.
    pub async fn login(email: &str, password: &str, pool: &PgPool) -> ApiResult<Self> {
        let user = Self::with_email_opt(email, pool)
            .await?
            .ok_or(ApiError::Unauthorized)?;

        let valid = bcrypt::verify(password, &user.pass_hash)
            .map_err(|err| ApiError::ServerError(format!("failed to verify password: {}", err)))?;
        if valid {
            Ok(user)
        } else {
            Err(ApiError::Unauthorized)
        }
    }

    pub async fn update_profile(id: i64, update: ProfileUpdate, pool: &PgPool) -> ApiResult<Self> {
        let user = Self::with_id(id, pool).await?;

        if update.email != user.email {
            if Self::with_email_opt(&update.email, pool).await?.is_some() {
                return Err(ApiError::BadRequest(format!(
                    "cannot change email to {}, as another user has that email",
                    update.email
                )));
            }
        }

        sqlx::query_as::<_, Self>(
            "UPDATE users SET
                 email = $1, first_name = $2, last_name = $3, bio = $4, avatar = $5,
                 student_id = $6, batch_year = $7, github_username = $8, tech_skills = $9,
                 skill_level = $10, portfolio_url = $11, linkedin_url = $12, updated_at = now()
             WHERE id = $13
             RETURNING *",
        )
        .bind(&update.email)
        .bind(&update.first_name)
        .bind(&update.last_name)
        .bind(&update.bio)
        .bind(&update.avatar)
        .bind(&update.student_id)
        .bind(update.batch_year)
        .bind(&update.github_username)
        .bind(&update.tech_skills)
        .bind(update.skill_level)
        .bind(&update.portfolio_url)
        .bind(&update.linkedin_url)
        .bind(id)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Adds a (possibly negative) delta to a user's points, returning the
    /// new total. The only path that mutates points.
    pub async fn adjust_points(id: i64, delta: i32, pool: &PgPool) -> ApiResult<i32> {
        Self::with_id(id, pool).await?;

        sqlx::query_scalar::<_, i32>(
            "UPDATE users SET points = points + $1, updated_at = now()
             WHERE id = $2
             RETURNING points",
        )
        .bind(delta)
        .bind(id)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }
}

/// The public projection of a user, as returned by `/user/profile`.
#[derive(Debug, Serialize)]
pub struct Profile {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub student_id: Option<String>,
    pub batch_year: Option<i32>,
    pub points: i32,
    pub is_member: bool,
    pub is_club_admin: bool,
    pub is_staff: bool,
    pub avatar: Option<String>,
    pub bio: Option<String>,
    pub github_username: Option<String>,
    pub linkedin_url: Option<String>,
    pub portfolio_url: Option<String>,
    pub tech_skills: Vec<String>,
    pub skill_level: Option<SkillLevel>,
}

#[derive(Debug, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub student_id: Option<String>,
    pub batch_year: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct ProfileUpdate {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub bio: Option<String>,
    pub avatar: Option<String>,
    pub student_id: Option<String>,
    pub batch_year: Option<i32>,
    pub github_username: Option<String>,
    #[serde(default)]
    pub tech_skills: Vec<String>,
    pub skill_level: Option<SkillLevel>,
    pub portfolio_url: Option<String>,
    pub linkedin_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use crate::tests::mock::mock_user;

    #[test]
    fn full_name_joins_and_trims() {
        let mut user = mock_user();
        user.first_name = String::from("Ada");
        user.last_name = String::from("Lovelace");
        assert_eq!(user.full_name(), "Ada Lovelace");

        user.last_name = String::new();
        assert_eq!(user.full_name(), "Ada");
    }

    #[test]
    fn full_name_falls_back_to_username() {
        let mut user = mock_user();
        user.first_name = String::new();
        user.last_name = String::new();
        user.username = String::from("devjane");
        assert_eq!(user.full_name(), "devjane");
    }

    #[test]
    fn profile_never_exposes_credentials() {
        let user = mock_user();
        let profile = serde_json::to_value(user.profile()).unwrap();

        let fields = profile.as_object().unwrap();
        assert!(!fields.contains_key("pass_hash"));
        assert!(!fields.contains_key("provider"));
        assert!(!fields.contains_key("provider_id"));
        assert!(!fields.contains_key("github_id"));
    }

    #[test]
    fn profile_serializes_absent_fields_as_null() {
        let mut user = mock_user();
        user.bio = None;
        user.skill_level = None;

        let profile = serde_json::to_value(user.profile()).unwrap();
        assert!(profile["bio"].is_null());
        assert!(profile["skill_level"].is_null());
    }
}
