use axum::extract::{Extension, Path};
use axum::http::StatusCode;
use axum::Json;
use sqlx::PgPool;

use crate::auth::{AdminUser, AuthenticatedUser};
use crate::error::ApiResult;
use crate::models::event::attendance::{Attendance, NewAttendance};
use crate::models::event::{Event, EventResponse, NewEvent};

pub async fn all_events(
    AuthenticatedUser(_user): AuthenticatedUser,
    Extension(pool): Extension<PgPool>,
) -> ApiResult<Json<Vec<EventResponse>>> {
    let events = Event::all(&pool).await?;

    Ok(Json(events.into_iter().map(EventResponse::from).collect()))
}

pub async fn get_event(
    AuthenticatedUser(_user): AuthenticatedUser,
    Path(id): Path<i64>,
    Extension(pool): Extension<PgPool>,
) -> ApiResult<Json<EventResponse>> {
    let event = Event::with_id(id, &pool).await?;

    Ok(Json(EventResponse::from(event)))
}

pub async fn create_event(
    AdminUser(_admin): AdminUser,
    Extension(pool): Extension<PgPool>,
    Json(new_event): Json<NewEvent>,
) -> ApiResult<(StatusCode, Json<EventResponse>)> {
    let event = Event::create(new_event, &pool).await?;

    Ok((StatusCode::CREATED, Json(EventResponse::from(event))))
}

pub async fn update_event(
    AdminUser(_admin): AdminUser,
    Path(id): Path<i64>,
    Extension(pool): Extension<PgPool>,
    Json(update): Json<NewEvent>,
) -> ApiResult<Json<EventResponse>> {
    let event = Event::update(id, update, &pool).await?;

    Ok(Json(EventResponse::from(event)))
}

pub async fn delete_event(
    AdminUser(_admin): AdminUser,
    Path(id): Path<i64>,
    Extension(pool): Extension<PgPool>,
) -> ApiResult<StatusCode> {
    Event::delete(id, &pool).await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn event_attendance(
    AdminUser(_admin): AdminUser,
    Path(id): Path<i64>,
    Extension(pool): Extension<PgPool>,
) -> ApiResult<Json<Vec<Attendance>>> {
    let attendance = Attendance::for_event(id, &pool).await?;

    Ok(Json(attendance))
}

pub async fn mark_attendance(
    AdminUser(admin): AdminUser,
    Path(id): Path<i64>,
    Extension(pool): Extension<PgPool>,
    Json(new_attendance): Json<NewAttendance>,
) -> ApiResult<(StatusCode, Json<Attendance>)> {
    let attendance = Attendance::mark(id, new_attendance, admin.id, &pool).await?;

    Ok((StatusCode::CREATED, Json(attendance)))
}
