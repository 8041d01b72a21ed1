use time::{Duration, OffsetDateTime};

use crate::models::event::{Event, EventType};
use crate::models::project::{Project, ProjectStatus};
use crate::models::task::{Task, TaskStatus};
use crate::models::user::{AuthProvider, SkillLevel, User};
use crate::util::current_time;

fn timestamp(seconds: i64) -> OffsetDateTime {
    OffsetDateTime::from_unix_timestamp(seconds).unwrap()
}

pub fn mock_user() -> User {
    User {
        id: 1,
        username: String::from("devjane"),
        email: String::from("jane.doe@devclub.edu"),
        first_name: String::from("Jane"),
        last_name: String::from("Doe"),
        pass_hash: String::from("$2b$10$notarealhashnotarealhash"),
        bio: Some(String::from("I like building things")),
        avatar: Some(String::from("avatars/devjane.png")),
        student_id: Some(String::from("SDC2023042")),
        batch_year: Some(2026),
        points: 120,
        github_username: Some(String::from("devjane")),
        tech_skills: vec![String::from("Rust"), String::from("Postgres")],
        skill_level: Some(SkillLevel::Intermediate),
        portfolio_url: None,
        linkedin_url: None,
        provider: Some(AuthProvider::Github),
        provider_id: Some(String::from("8675309")),
        github_id: Some(String::from("8675309")),
        is_member: true,
        is_club_admin: false,
        is_staff: false,
        created_at: timestamp(1_600_000_000),
        updated_at: timestamp(1_600_000_000),
    }
}

pub fn mock_event() -> Event {
    Event {
        id: 1,
        title: String::from("Intro to Systems Programming"),
        description: String::from("A hands-on workshop on memory and ownership"),
        event_type: EventType::Meetup,
        event_date: current_time() + Duration::days(3),
        location: String::from("Online"),
        meeting_link: Some(String::from("https://meet.devclub.edu/systems")),
        banner: None,
        created_at: timestamp(1_600_000_000),
    }
}

pub fn mock_task() -> Task {
    Task {
        id: 1,
        title: String::from("Fix the leaderboard"),
        description: String::from("Points are sorted ascending, should be descending"),
        assigned_to: 1,
        status: TaskStatus::Pending,
        points: 10,
        due_date: None,
        submission_link: None,
        created_at: timestamp(1_600_000_000),
        updated_at: timestamp(1_600_000_000),
    }
}

pub fn mock_project() -> Project {
    Project {
        id: 1,
        name: String::from("Club Site"),
        description: String::from("The club's public website"),
        status: ProjectStatus::InProgress,
        tech_stack: vec![String::from("Rust"), String::from("Svelte")],
        github_repo: Some(String::from("https://github.com/devclub/site")),
        demo_url: None,
        image: None,
        lead: Some(1),
        created_at: timestamp(1_600_000_000),
        updated_at: timestamp(1_600_000_000),
    }
}
