use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db::{self, Profile, Role};

pub async fn create_profile(
    db_pool: &SqlitePool,
    email: &str,
    full_name: Option<&str>,
    role: Role,
) -> Result<Profile, sqlx::Error> {
    let now = db::now();
    sqlx::query_as(
        "INSERT INTO profiles (id,email,full_name,role,created_at,updated_at) VALUES (?,?,?,?,?,?) RETURNING *",
    )
    .bind(Uuid::now_v7())
    .bind(email)
    .bind(full_name)
    .bind(role)
    .bind(now)
    .bind(now)
    .fetch_one(db_pool)
    .await
}

pub async fn find_profile(db_pool: &SqlitePool, id: Uuid) -> Result<Option<Profile>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM profiles WHERE id=?")
        .bind(id)
        .fetch_optional(db_pool)
        .await
}

pub async fn find_profile_by_email(db_pool: &SqlitePool, email: &str) -> Result<Option<Profile>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM profiles WHERE email=?")
        .bind(email)
        .fetch_optional(db_pool)
        .await
}

/// Everyone a message could be addressed to, except `viewer_id`.
pub async fn list_recipients(db_pool: &SqlitePool, viewer_id: Uuid) -> Result<Vec<Profile>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM profiles WHERE id<>? ORDER BY coalesce(full_name, email)")
        .bind(viewer_id)
        .fetch_all(db_pool)
        .await
}
