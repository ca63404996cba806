use axum::{
    debug_handler,
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{
    access,
    auth::Viewer,
    include_res,
    profiles,
    res,
    AppResult, AppState,
};

use super::store::{self, Addressing, NewMessage};

#[derive(Debug, Deserialize)]
pub(crate) struct NewMessageQuery {
    recipient: Option<Uuid>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct NewMessageForm {
    #[serde(default)]
    pub(crate) broadcast: Option<String>,
    #[serde(default)]
    pub(crate) recipient_id: Option<String>,
    pub(crate) subject: String,
    pub(crate) content: String,
}

impl NewMessageForm {
    fn is_broadcast(&self) -> bool {
        self.broadcast.as_deref().is_some_and(|value| !value.is_empty())
    }

    /// Turns the submitted fields into an insertable message, or says what is wrong.
    pub(crate) fn validate(&self, sender: &Viewer) -> Result<NewMessage, &'static str> {
        let subject = self.subject.trim();
        let content = self.content.trim();
        if subject.is_empty() {
            return Err("Subject is required");
        }
        if content.is_empty() {
            return Err("Message is required");
        }

        let addressing = if self.is_broadcast() {
            if !access::can_compose_broadcast(sender) {
                return Err("Only admins can send broadcasts");
            }
            Addressing::Broadcast
        } else {
            let recipient = self.recipient_id.as_deref().map(str::trim).unwrap_or_default();
            if recipient.is_empty() {
                return Err("Choose a recipient");
            }
            let Ok(recipient_id) = Uuid::parse_str(recipient) else {
                return Err("Recipient not found");
            };
            if recipient_id == sender.id {
                return Err("You cannot send a message to yourself");
            }
            Addressing::Direct(recipient_id)
        };

        Ok(NewMessage {
            sender_id: sender.id,
            addressing,
            subject: subject.to_owned(),
            content: content.to_owned(),
        })
    }
}

#[debug_handler(state = AppState)]
pub(crate) async fn new_message_page(
    viewer: Viewer,
    Query(NewMessageQuery { recipient }): Query<NewMessageQuery>,
    State(db_pool): State<SqlitePool>,
) -> AppResult<Response> {
    let form = NewMessageForm {
        broadcast: (recipient.is_none() && access::can_compose_broadcast(&viewer)).then(|| "on".to_owned()),
        recipient_id: recipient.map(|id| id.to_string()),
        ..Default::default()
    };
    render_form(&db_pool, &viewer, &form, None, StatusCode::OK).await
}

#[debug_handler(state = AppState)]
pub(crate) async fn new_message(
    viewer: Viewer,
    State(db_pool): State<SqlitePool>,
    Form(form): Form<NewMessageForm>,
) -> AppResult<Response> {
    let new = match form.validate(&viewer) {
        Ok(new) => new,
        Err(error) => return render_form(&db_pool, &viewer, &form, Some(error), StatusCode::BAD_REQUEST).await,
    };

    if let Addressing::Direct(recipient_id) = new.addressing {
        if profiles::store::find_profile(&db_pool, recipient_id).await?.is_none() {
            return render_form(&db_pool, &viewer, &form, Some("Recipient not found"), StatusCode::BAD_REQUEST)
                .await;
        }
    }

    match store::insert_message(&db_pool, new).await {
        Ok(message) => {
            tracing::info!(
                message_id = %message.id,
                sender_id = %viewer.id,
                broadcast = message.is_broadcast,
                "message sent"
            );
            Ok(Redirect::to("/dashboard/messages").into_response())
        }
        Err(err) => {
            tracing::error!(error = ?err, sender_id = %viewer.id, "message insert failed");
            render_form(
                &db_pool,
                &viewer,
                &form,
                Some("The message could not be sent. Please try again."),
                StatusCode::INTERNAL_SERVER_ERROR,
            )
            .await
        }
    }
}

async fn render_form(
    db_pool: &SqlitePool,
    viewer: &Viewer,
    form: &NewMessageForm,
    error: Option<&str>,
    status: StatusCode,
) -> AppResult<Response> {
    let recipients = profiles::store::list_recipients(db_pool, viewer.id).await?;
    let recipient_ids: Vec<String> = recipients.iter().map(|profile| profile.id.to_string()).collect();
    let recipient_options = res::options(
        recipient_ids
            .iter()
            .zip(&recipients)
            .map(|(id, profile)| (id.as_str(), profile.display_name())),
        form.recipient_id.as_deref(),
    );

    let broadcast_toggle = if access::can_compose_broadcast(viewer) {
        include_res!(str, "/pages/messages/broadcast_toggle.html")
            .replace("{checked}", if form.is_broadcast() { "checked" } else { "" })
    } else {
        String::new()
    };

    let body = include_res!(str, "/pages/messages/new.html")
        .replace("{error}", &res::error_banner(error))
        .replace("{broadcast_toggle}", &broadcast_toggle)
        .replace("{recipient_options}", &recipient_options)
        .replace("{subject}", &res::escape(&form.subject))
        .replace("{content}", &res::escape(&form.content));

    Ok((status, Html(res::layout(Some(viewer), "New message", &body))).into_response())
}
