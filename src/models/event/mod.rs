use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use time::OffsetDateTime;

use crate::error::{ApiError, ApiResult};
use crate::util::current_time;

pub mod attendance;

/// How many events the dashboard shows ahead.
pub const UPCOMING_EVENT_COUNT: i64 = 5;

/// A scheduled club activity.
#[derive(Clone, Debug, sqlx::FromRow)]
pub struct Event {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub event_type: EventType,
    /// When the event happens
    pub event_date: OffsetDateTime,
    /// Physical location or "Online"
    pub location: String,
    pub meeting_link: Option<String>,
    /// A reference to a banner image in the object store
    pub banner: Option<String>,
    pub created_at: OffsetDateTime,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "event_type", rename_all = "snake_case")]
pub enum EventType {
    Workshop,
    Hackathon,
    Meetup,
    Webinar,
    Other,
}

impl Default for EventType {
    fn default() -> Self {
        EventType::Meetup
    }
}

impl Event {
    /// Whether the event has already happened. Derived at read time,
    /// never stored.
    pub fn is_past(&self) -> bool {
        self.event_date < current_time()
    }

    pub async fn with_id(id: i64, pool: &PgPool) -> ApiResult<Self> {
        Self::with_id_opt(id, pool)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("no event with id {}", id)))
    }

    pub async fn with_id_opt(id: i64, pool: &PgPool) -> ApiResult<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM events WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// All events, newest first.
    pub async fn all(pool: &PgPool) -> ApiResult<Vec<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM events ORDER BY event_date DESC")
            .fetch_all(pool)
            .await
            .map_err(Into::into)
    }

    /// The next few events that have not yet started, soonest first.
    pub async fn upcoming(pool: &PgPool) -> ApiResult<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM events WHERE event_date >= $1
             ORDER BY event_date LIMIT $2",
        )
        .bind(current_time())
        .bind(UPCOMING_EVENT_COUNT)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn create(new_event: NewEvent, pool: &PgPool) -> ApiResult<Self> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO events
                 (title, description, event_type, event_date, location, meeting_link, banner)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING *",
        )
        .bind(&new_event.title)
        .bind(&new_event.description)
        .bind(new_event.event_type)
        .bind(new_event.event_date)
        .bind(&new_event.location)
        .bind(&new_event.meeting_link)
        .bind(&new_event.banner)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn update(id: i64, update: NewEvent, pool: &PgPool) -> ApiResult<Self> {
        Self::with_id(id, pool).await?;

        sqlx::query_as::<_, Self>(
            "UPDATE events SET
                 title = $1, description = $2, event_type = $3, event_date = $4,
                 location = $5, meeting_link = $6, banner = $7
             WHERE id = $8
             RETURNING *",
        )
        .bind(&update.title)
        .bind(&update.description)
        .bind(update.event_type)
        .bind(update.event_date)
        .bind(&update.location)
        .bind(&update.meeting_link)
        .bind(&update.banner)
        .bind(id)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn delete(id: i64, pool: &PgPool) -> ApiResult<()> {
        Self::with_id(id, pool).await?;

        sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(())
    }
}

/// The wire shape of an event, including the derived `is_past` flag.
#[derive(Debug, Serialize)]
pub struct EventResponse {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub event_type: EventType,
    #[serde(with = "time::serde::rfc3339")]
    pub event_date: OffsetDateTime,
    pub location: String,
    pub meeting_link: Option<String>,
    pub banner: Option<String>,
    pub is_past: bool,
}

impl From<Event> for EventResponse {
    fn from(event: Event) -> Self {
        let is_past = event.is_past();

        EventResponse {
            id: event.id,
            title: event.title,
            description: event.description,
            event_type: event.event_type,
            event_date: event.event_date,
            location: event.location,
            meeting_link: event.meeting_link,
            banner: event.banner,
            is_past,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct NewEvent {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub event_type: EventType,
    #[serde(with = "time::serde::rfc3339")]
    pub event_date: OffsetDateTime,
    pub location: String,
    pub meeting_link: Option<String>,
    pub banner: Option<String>,
}

#[cfg(test)]
mod tests {
    use time::Duration;

    use super::*;
    use crate::tests::mock::mock_event;

    #[test]
    fn is_past_flips_as_time_crosses_event_date() {
        let mut event = mock_event();

        event.event_date = current_time() - Duration::minutes(1);
        assert!(event.is_past());

        event.event_date = current_time() + Duration::minutes(1);
        assert!(!event.is_past());
    }

    #[test]
    fn response_carries_derived_is_past() {
        let mut event = mock_event();
        event.event_date = current_time() - Duration::hours(2);

        let response = EventResponse::from(event);
        assert!(response.is_past);
    }

    #[test]
    fn absent_links_serialize_as_null() {
        let mut event = mock_event();
        event.meeting_link = None;
        event.banner = None;

        let json = serde_json::to_value(EventResponse::from(event)).unwrap();
        assert!(json["meeting_link"].is_null());
        assert!(json["banner"].is_null());
        assert_eq!(json["event_type"], serde_json::json!("meetup"));
    }

    #[test]
    fn unknown_event_types_are_rejected() {
        assert!(serde_json::from_str::<EventType>("\"concert\"").is_err());
    }
}
