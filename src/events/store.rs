use sqlx::SqlitePool;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::db::{self, Event, EventWithOrganiser};

const SELECT_WITH_ORGANISER: &str = "SELECT e.*, p.full_name AS author_name, p.email AS author_email \
     FROM events e LEFT JOIN profiles p ON p.id=e.created_by";

#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    pub title: String,
    pub description: Option<String>,
    pub center_name: String,
    pub location: String,
    pub scheduled_date: OffsetDateTime,
    pub duration_hours: Option<f64>,
    pub activity_type: Option<String>,
    pub created_by: Uuid,
}

pub async fn insert_event(db_pool: &SqlitePool, new: NewEvent) -> Result<Event, sqlx::Error> {
    let now = db::now();
    sqlx::query_as(
        "INSERT INTO events (id,title,description,center_name,location,scheduled_date,duration_hours,\
         activity_type,created_by,created_at,updated_at) VALUES (?,?,?,?,?,?,?,?,?,?,?) RETURNING *",
    )
    .bind(Uuid::now_v7())
    .bind(&new.title)
    .bind(&new.description)
    .bind(&new.center_name)
    .bind(&new.location)
    .bind(new.scheduled_date)
    .bind(new.duration_hours)
    .bind(&new.activity_type)
    .bind(new.created_by)
    .bind(now)
    .bind(now)
    .fetch_one(db_pool)
    .await
}

pub async fn find_event(db_pool: &SqlitePool, id: Uuid) -> Result<Option<EventWithOrganiser>, sqlx::Error> {
    sqlx::query_as(&format!("{SELECT_WITH_ORGANISER} WHERE e.id=?"))
        .bind(id)
        .fetch_optional(db_pool)
        .await
}

/// Events at or after `now`, soonest first.
pub async fn list_upcoming(
    db_pool: &SqlitePool,
    now: OffsetDateTime,
    limit: Option<i64>,
) -> Result<Vec<EventWithOrganiser>, sqlx::Error> {
    sqlx::query_as(&format!(
        "{SELECT_WITH_ORGANISER} WHERE e.scheduled_date>=? ORDER BY e.scheduled_date ASC LIMIT ?"
    ))
    .bind(now)
    .bind(limit.unwrap_or(-1))
    .fetch_all(db_pool)
    .await
}

/// Events before `now`, most recent first.
pub async fn list_past(db_pool: &SqlitePool, now: OffsetDateTime) -> Result<Vec<EventWithOrganiser>, sqlx::Error> {
    sqlx::query_as(&format!(
        "{SELECT_WITH_ORGANISER} WHERE e.scheduled_date<? ORDER BY e.scheduled_date DESC"
    ))
    .bind(now)
    .fetch_all(db_pool)
    .await
}

/// Events a visit report can be linked to, newest first.
pub async fn list_choices(db_pool: &SqlitePool) -> Result<Vec<Event>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM events ORDER BY scheduled_date DESC LIMIT 100")
        .fetch_all(db_pool)
        .await
}
