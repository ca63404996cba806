use sqlx::SqlitePool;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    access::MESSAGE_VISIBLE_SQL,
    db::{self, Message, MessageListing},
};

/// Who a new message goes to. A broadcast never names a recipient.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Addressing {
    Broadcast,
    Direct(Uuid),
}

impl Addressing {
    fn columns(self) -> (Option<Uuid>, bool) {
        match self {
            Addressing::Broadcast => (None, true),
            Addressing::Direct(recipient_id) => (Some(recipient_id), false),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewMessage {
    pub sender_id: Uuid,
    pub addressing: Addressing,
    pub subject: String,
    pub content: String,
}

pub async fn insert_message(db_pool: &SqlitePool, new: NewMessage) -> Result<Message, sqlx::Error> {
    let (recipient_id, is_broadcast) = new.addressing.columns();
    sqlx::query_as(
        "INSERT INTO messages (id,sender_id,recipient_id,subject,content,is_broadcast,read_at,created_at) \
         VALUES (?,?,?,?,?,?,NULL,?) RETURNING *",
    )
    .bind(Uuid::now_v7())
    .bind(new.sender_id)
    .bind(recipient_id)
    .bind(&new.subject)
    .bind(&new.content)
    .bind(is_broadcast)
    .bind(db::now())
    .fetch_one(db_pool)
    .await
}

/// Messages addressed to the viewer plus broadcasts from anyone else, newest first.
pub async fn inbox(db_pool: &SqlitePool, viewer_id: Uuid) -> Result<Vec<MessageListing>, sqlx::Error> {
    sqlx::query_as(
        "SELECT m.*, p.full_name AS author_name, p.email AS author_email \
         FROM messages m LEFT JOIN profiles p ON p.id=m.sender_id \
         WHERE m.recipient_id=? OR (m.is_broadcast=1 AND m.sender_id<>?) \
         ORDER BY m.created_at DESC, m.id DESC",
    )
    .bind(viewer_id)
    .bind(viewer_id)
    .fetch_all(db_pool)
    .await
}

/// Messages the viewer sent, with the recipient attached as the other party.
pub async fn sent(db_pool: &SqlitePool, viewer_id: Uuid) -> Result<Vec<MessageListing>, sqlx::Error> {
    sqlx::query_as(
        "SELECT m.*, p.full_name AS author_name, p.email AS author_email \
         FROM messages m LEFT JOIN profiles p ON p.id=m.recipient_id \
         WHERE m.sender_id=? \
         ORDER BY m.created_at DESC, m.id DESC",
    )
    .bind(viewer_id)
    .fetch_all(db_pool)
    .await
}

pub async fn count_unread(db_pool: &SqlitePool, viewer_id: Uuid) -> Result<i64, sqlx::Error> {
    let (count,): (i64,) = sqlx::query_as(
        "SELECT count(*) FROM messages \
         WHERE (recipient_id=? OR (is_broadcast=1 AND sender_id<>?)) AND read_at IS NULL",
    )
    .bind(viewer_id)
    .bind(viewer_id)
    .fetch_one(db_pool)
    .await?;
    Ok(count)
}

/// Detail fetch that only returns the row when the viewer may read it.
pub async fn find_visible(
    db_pool: &SqlitePool,
    id: Uuid,
    viewer_id: Uuid,
) -> Result<Option<MessageListing>, sqlx::Error> {
    let sql = format!(
        "SELECT m.*, p.full_name AS author_name, p.email AS author_email \
         FROM messages m LEFT JOIN profiles p ON p.id=m.sender_id \
         WHERE m.id=? AND {MESSAGE_VISIBLE_SQL}"
    );
    sqlx::query_as(&sql)
        .bind(id)
        .bind(viewer_id)
        .bind(viewer_id)
        .fetch_optional(db_pool)
        .await
}

/// Existence probe that reads no content.
pub async fn exists(db_pool: &SqlitePool, id: Uuid) -> Result<bool, sqlx::Error> {
    Ok(sqlx::query("SELECT 1 FROM messages WHERE id=?")
        .bind(id)
        .fetch_optional(db_pool)
        .await?
        .is_some())
}

/// Persists a read transition. Returns false when no row of `recipient_id` matched.
pub async fn set_read_at(
    db_pool: &SqlitePool,
    id: Uuid,
    recipient_id: Uuid,
    read_at: OffsetDateTime,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE messages SET read_at=? WHERE id=? AND recipient_id=? AND is_broadcast=0")
        .bind(read_at)
        .bind(id)
        .bind(recipient_id)
        .execute(db_pool)
        .await?;
    Ok(result.rows_affected() == 1)
}
