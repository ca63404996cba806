use sqlx::SqlitePool;
use time::Date;
use uuid::Uuid;

use crate::{
    access::ReportScope,
    db::{self, ReportWithAuthor, VisitReport},
};

const SELECT_WITH_AUTHOR: &str = "SELECT r.*, p.full_name AS author_name, p.email AS author_email \
     FROM visit_reports r LEFT JOIN profiles p ON p.id=r.volunteer_id";

#[derive(Debug, Clone, PartialEq)]
pub struct NewReport {
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
}

pub async fn insert_report(db_pool: &SqlitePool, new: NewReport) -> Result<VisitReport, sqlx::Error> {
    let now = db::now();
    sqlx::query_as(
        "INSERT INTO visit_reports (id,event_id,volunteer_id,email,visit_date,duration_hours,center_name,location,\
         activity_type,children_count,children_names,activity_description,testimonials,child_observations,\
         created_at,updated_at) VALUES (?,?,?,?,?,?,?,?,?,?,?,?,?,?,?,?) RETURNING *",
    )
    .bind(Uuid::now_v7())
    .bind(new.event_id)
    .bind(new.volunteer_id)
    .bind(&new.email)
    .bind(new.visit_date)
    .bind(new.duration_hours)
    .bind(&new.center_name)
    .bind(&new.location)
    .bind(&new.activity_type)
    .bind(new.children_count)
    .bind(&new.children_names)
    .bind(&new.activity_description)
    .bind(&new.testimonials)
    .bind(&new.child_observations)
    .bind(now)
    .bind(now)
    .fetch_one(db_pool)
    .await
}

pub async fn find_report(db_pool: &SqlitePool, id: Uuid) -> Result<Option<ReportWithAuthor>, sqlx::Error> {
    sqlx::query_as(&format!("{SELECT_WITH_AUTHOR} WHERE r.id=?"))
        .bind(id)
        .fetch_optional(db_pool)
        .await
}

/// The viewer's own reports, latest visit first.
pub async fn list_by_volunteer(db_pool: &SqlitePool, volunteer_id: Uuid) -> Result<Vec<ReportWithAuthor>, sqlx::Error> {
    sqlx::query_as(&format!(
        "{SELECT_WITH_AUTHOR} WHERE r.volunteer_id=? ORDER BY r.visit_date DESC, r.created_at DESC"
    ))
    .bind(volunteer_id)
    .fetch_all(db_pool)
    .await
}

pub async fn list_scoped(
    db_pool: &SqlitePool,
    viewer_id: Uuid,
    scope: ReportScope,
) -> Result<Vec<ReportWithAuthor>, sqlx::Error> {
    match scope {
        ReportScope::All => {
            sqlx::query_as(&format!("{SELECT_WITH_AUTHOR} ORDER BY r.visit_date DESC, r.created_at DESC"))
                .fetch_all(db_pool)
                .await
        }
        ReportScope::Others => {
            sqlx::query_as(&format!(
                "{SELECT_WITH_AUTHOR} WHERE r.volunteer_id<>? ORDER BY r.visit_date DESC, r.created_at DESC"
            ))
            .bind(viewer_id)
            .fetch_all(db_pool)
            .await
        }
    }
}

pub async fn list_recent(db_pool: &SqlitePool, limit: i64) -> Result<Vec<ReportWithAuthor>, sqlx::Error> {
    sqlx::query_as(&format!("{SELECT_WITH_AUTHOR} ORDER BY r.created_at DESC, r.id DESC LIMIT ?"))
        .bind(limit)
        .fetch_all(db_pool)
        .await
}

pub async fn list_for_event(db_pool: &SqlitePool, event_id: Uuid) -> Result<Vec<ReportWithAuthor>, sqlx::Error> {
    sqlx::query_as(&format!("{SELECT_WITH_AUTHOR} WHERE r.event_id=? ORDER BY r.visit_date DESC"))
        .bind(event_id)
        .fetch_all(db_pool)
        .await
}

pub async fn count_reports_by(db_pool: &SqlitePool, volunteer_id: Uuid) -> Result<i64, sqlx::Error> {
    let (count,): (i64,) = sqlx::query_as("SELECT count(*) FROM visit_reports WHERE volunteer_id=?")
        .bind(volunteer_id)
        .fetch_one(db_pool)
        .await?;
    Ok(count)
}

pub async fn count_reports(db_pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    let (count,): (i64,) = sqlx::query_as("SELECT count(*) FROM visit_reports")
        .fetch_one(db_pool)
        .await?;
    Ok(count)
}
