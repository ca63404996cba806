//! Read state of directly addressed messages.
//!
//! A message starts `Unread` and moves to `Read` once its recipient marks it.
//! There is no way back. Broadcasts carry no per-recipient state, so marking
//! one is refused rather than silently ignored.

use time::OffsetDateTime;

use crate::{auth::Viewer, db::Message};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadState {
    Unread,
    Read(OffsetDateTime),
}

impl ReadState {
    pub fn of(message: &Message) -> Self {
        match message.read_at {
            Some(at) => ReadState::Read(at),
            None => ReadState::Unread,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ReadError {
    #[error("broadcasts cannot be marked as read")]
    Broadcast,
    #[error("only the recipient can mark a message as read")]
    NotRecipient,
}

/// Validates the transition and returns the `read_at` to persist.
///
/// Re-marking is allowed and never moves `read_at` backwards.
pub fn mark_as_read(
    message: &Message,
    actor: &Viewer,
    now: OffsetDateTime,
) -> Result<OffsetDateTime, ReadError> {
    if message.is_broadcast {
        return Err(ReadError::Broadcast);
    }
    if message.recipient_id != Some(actor.id) {
        return Err(ReadError::NotRecipient);
    }

    Ok(match message.read_at {
        Some(previous) => previous.max(now),
        None => now,
    })
}

/// Whether the detail page should offer the "mark as read" button.
pub fn can_mark_as_read(message: &Message, viewer: &Viewer) -> bool {
    ReadState::of(message) == ReadState::Unread && mark_as_read(message, viewer, message.created_at).is_ok()
}

pub fn unread_count<'a>(inbox: impl IntoIterator<Item = &'a Message>) -> usize {
    inbox
        .into_iter()
        .filter(|message| message.read_at.is_none())
        .count()
}
