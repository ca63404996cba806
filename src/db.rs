use std::str::FromStr;

use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    FromRow, SqlitePool,
};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::config::Config;

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
pub enum Role {
    Volunteer,
    Admin,
}

#[derive(Debug, Clone, FromRow)]
pub struct Profile {
    pub id: Uuid,
    pub email: String,
    pub full_name: Option<String>,
    pub role: Role,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,

    // unique: id
    // unique: email
}

impl Profile {
    /// Name shown next to anything this profile authored.
    pub fn display_name(&self) -> &str {
        self.full_name.as_deref().unwrap_or(&self.email)
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub center_name: String,
    pub location: String,
    pub scheduled_date: OffsetDateTime,
    pub duration_hours: Option<f64>,
    pub activity_type: Option<String>,
    pub created_by: Uuid,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, FromRow)]
pub struct VisitReport {
    pub id: Uuid,
    pub event_id: Option<Uuid>,
    pub volunteer_id: Uuid,
    pub email: String,
    pub visit_date: Date,
    pub duration_hours: f64,
    pub center_name: String,
    pub location: String,
    pub activity_type: String,
    pub children_count: i64,
    pub children_names: String,
    pub activity_description: String,
    pub testimonials: Option<String>,
    pub child_observations: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, FromRow)]
pub struct Message {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub recipient_id: Option<Uuid>,
    pub subject: String,
    pub content: String,
    pub is_broadcast: bool,
    pub read_at: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,

    // is_broadcast => recipient_id is null
    // !is_broadcast => recipient_id is not null
}

/// Display fields of the profile a row points at, attached by a join.
#[derive(Debug, Clone, Default, FromRow)]
pub struct Author {
    pub author_name: Option<String>,
    pub author_email: Option<String>,
}

impl Author {
    pub fn label(&self) -> &str {
        self.author_name
            .as_deref()
            .or(self.author_email.as_deref())
            .unwrap_or("Anonymous")
    }
}

/// A message plus the other party: the sender in an inbox, the recipient in a sent list.
#[derive(Debug, Clone, FromRow)]
pub struct MessageListing {
    #[sqlx(flatten)]
    pub message: Message,
    #[sqlx(flatten)]
    pub party: Author,
}

#[derive(Debug, Clone, FromRow)]
pub struct ReportWithAuthor {
    #[sqlx(flatten)]
    pub report: VisitReport,
    #[sqlx(flatten)]
    pub author: Author,
}

#[derive(Debug, Clone, FromRow)]
pub struct EventWithOrganiser {
    #[sqlx(flatten)]
    pub event: Event,
    #[sqlx(flatten)]
    pub organiser: Author,
}

pub const ACTIVITY_TYPES: [&str; 5] = [
    "Educational workshop/personal development",
    "Recreational activity/socialising",
    "Tutoring/lessons (specific subject)",
    "Donation/distribution of materials",
    "Informal discussion/counselling",
];

/// Text before the first `/`, used as a compact badge.
pub fn activity_label(activity_type: &str) -> &str {
    activity_type
        .split('/')
        .next()
        .unwrap_or(activity_type)
        .trim()
}

/// Current time at whole-second precision so stored timestamps sort as text.
pub fn now() -> OffsetDateTime {
    let now = OffsetDateTime::now_utc();
    now.replace_nanosecond(0).unwrap_or(now)
}

pub async fn connect(config: &Config) -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&config.database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let db_pool = SqlitePoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect_with(options)
        .await?;

    migrate(&db_pool).await?;
    Ok(db_pool)
}

pub async fn migrate(db_pool: &SqlitePool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(db_pool).await?;
    Ok(())
}

/// Single-connection in-memory database, migrated and ready.
pub async fn memory() -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
    let db_pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    migrate(&db_pool).await?;
    Ok(db_pool)
}
