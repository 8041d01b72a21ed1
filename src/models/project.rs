use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use time::OffsetDateTime;

use crate::error::{ApiError, ApiResult};
use crate::models::user::User;

/// A club initiative worked on by members.
#[derive(Clone, Debug, sqlx::FromRow)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub status: ProjectStatus,
    /// Technologies used, in the order they matter
    pub tech_stack: Vec<String>,
    pub github_repo: Option<String>,
    pub demo_url: Option<String>,
    /// A reference to a cover image in the object store
    pub image: Option<String>,
    /// The project lead; removable without deleting the project
    pub lead: Option<i64>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Where a project is in its life. Transitions are free-form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "project_status", rename_all = "snake_case")]
pub enum ProjectStatus {
    Planning,
    InProgress,
    Completed,
    Archived,
}

impl Default for ProjectStatus {
    fn default() -> Self {
        ProjectStatus::Planning
    }
}

impl Project {
    pub async fn with_id(id: i64, pool: &PgPool) -> ApiResult<Self> {
        Self::with_id_opt(id, pool)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("no project with id {}", id)))
    }

    pub async fn with_id_opt(id: i64, pool: &PgPool) -> ApiResult<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM projects WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn all(pool: &PgPool) -> ApiResult<Vec<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM projects ORDER BY created_at DESC")
            .fetch_all(pool)
            .await
            .map_err(Into::into)
    }

    /// The ids of the users contributing to this project.
    pub async fn contributors(id: i64, pool: &PgPool) -> ApiResult<Vec<i64>> {
        sqlx::query_scalar::<_, i64>(
            "SELECT user_id FROM project_contributors WHERE project_id = $1 ORDER BY user_id",
        )
        .bind(id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    async fn set_contributors(id: i64, contributors: &[i64], pool: &PgPool) -> ApiResult<()> {
        for user_id in contributors {
            User::with_id(*user_id, pool).await?;
        }

        sqlx::query("DELETE FROM project_contributors WHERE project_id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        // TODO: make batch query
        for user_id in contributors {
            sqlx::query(
                "INSERT INTO project_contributors (project_id, user_id) VALUES ($1, $2)
                 ON CONFLICT DO NOTHING",
            )
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        }

        Ok(())
    }

    pub async fn create(new_project: NewProject, pool: &PgPool) -> ApiResult<Self> {
        if let Some(lead) = new_project.lead {
            User::with_id(lead, pool).await?;
        }

        let project = sqlx::query_as::<_, Self>(
            "INSERT INTO projects
                 (name, description, status, tech_stack, github_repo, demo_url, image, lead)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING *",
        )
        .bind(&new_project.name)
        .bind(&new_project.description)
        .bind(new_project.status)
        .bind(&new_project.tech_stack)
        .bind(&new_project.github_repo)
        .bind(&new_project.demo_url)
        .bind(&new_project.image)
        .bind(new_project.lead)
        .fetch_one(pool)
        .await?;

        Self::set_contributors(project.id, &new_project.contributors, pool).await?;

        Ok(project)
    }

    pub async fn update(id: i64, update: NewProject, pool: &PgPool) -> ApiResult<Self> {
        Self::with_id(id, pool).await?;
        if let Some(lead) = update.lead {
            User::with_id(lead, pool).await?;
        }

        let project = sqlx::query_as::<_, Self>(
            "UPDATE projects SET
                 name = $1, description = $2, status = $3, tech_stack = $4,
                 github_repo = $5, demo_url = $6, image = $7, lead = $8, updated_at = now()
             WHERE id = $9
             RETURNING *",
        )
        .bind(&update.name)
        .bind(&update.description)
        .bind(update.status)
        .bind(&update.tech_stack)
        .bind(&update.github_repo)
        .bind(&update.demo_url)
        .bind(&update.image)
        .bind(update.lead)
        .bind(id)
        .fetch_one(pool)
        .await?;

        Self::set_contributors(id, &update.contributors, pool).await?;

        Ok(project)
    }

    pub async fn delete(id: i64, pool: &PgPool) -> ApiResult<()> {
        Self::with_id(id, pool).await?;

        sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(())
    }

    /// The full wire shape of this project, contributor list included.
    pub fn into_response(self, contributors: Vec<i64>) -> ProjectResponse {
        ProjectResponse {
            id: self.id,
            name: self.name,
            description: self.description,
            status: self.status,
            tech_stack: self.tech_stack,
            github_repo: self.github_repo,
            demo_url: self.demo_url,
            image: self.image,
            lead: self.lead,
            contributors,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProjectResponse {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub status: ProjectStatus,
    pub tech_stack: Vec<String>,
    pub github_repo: Option<String>,
    pub demo_url: Option<String>,
    pub image: Option<String>,
    pub lead: Option<i64>,
    pub contributors: Vec<i64>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Deserialize)]
pub struct NewProject {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default)]
    pub tech_stack: Vec<String>,
    pub github_repo: Option<String>,
    pub demo_url: Option<String>,
    pub image: Option<String>,
    pub lead: Option<i64>,
    #[serde(default)]
    pub contributors: Vec<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::mock::mock_project;

    #[test]
    fn new_projects_default_to_planning() {
        let new_project: NewProject = serde_json::from_str(
            "{\"name\": \"Club Site\", \"description\": \"The club's public website\"}",
        )
        .unwrap();

        assert_eq!(new_project.status, ProjectStatus::Planning);
        assert!(new_project.tech_stack.is_empty());
        assert!(new_project.contributors.is_empty());
    }

    #[test]
    fn response_carries_the_full_field_set() {
        let project = mock_project();
        let json = serde_json::to_value(project.into_response(vec![2, 5])).unwrap();

        assert_eq!(json["status"], serde_json::json!("in_progress"));
        assert_eq!(json["contributors"], serde_json::json!([2, 5]));
        assert!(json.as_object().unwrap().contains_key("lead"));
        assert!(json.as_object().unwrap().contains_key("tech_stack"));
    }
}
