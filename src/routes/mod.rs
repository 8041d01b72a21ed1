use axum::routing::{get, post};
use axum::Router;

pub mod auth;
pub mod dashboard;
pub mod events;
pub mod projects;
pub mod tasks;
pub mod users;

pub fn router() -> Router {
    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route(
            "/user/profile",
            get(users::profile).put(users::update_profile),
        )
        .route("/users", get(users::all_users))
        .route("/users/:id/points", post(users::adjust_points))
        .route("/dashboard", get(dashboard::dashboard))
        .route("/events", get(events::all_events).post(events::create_event))
        .route(
            "/events/:id",
            get(events::get_event)
                .put(events::update_event)
                .delete(events::delete_event),
        )
        .route(
            "/events/:id/attendance",
            get(events::event_attendance).post(events::mark_attendance),
        )
        .route(
            "/projects",
            get(projects::all_projects).post(projects::create_project),
        )
        .route(
            "/projects/:id",
            get(projects::get_project)
                .put(projects::update_project)
                .delete(projects::delete_project),
        )
        .route("/tasks", get(tasks::all_tasks).post(tasks::create_task))
        .route(
            "/tasks/:id",
            get(tasks::get_task)
                .put(tasks::update_task)
                .delete(tasks::delete_task),
        )
}
