use axum::{debug_handler, extract::State, response::{Html, IntoResponse, Response}};
use sqlx::SqlitePool;

use crate::{auth::Viewer, db::MessageListing, include_res, res, unread, AppResult, AppState};

#[debug_handler(state = AppState)]
pub(crate) async fn messages(
    viewer: Viewer,
    State(db_pool): State<SqlitePool>,
) -> AppResult<Response> {
    let inbox = super::store::inbox(&db_pool, viewer.id).await?;
    let sent = super::store::sent(&db_pool, viewer.id).await?;

    let unread = unread::unread_count(inbox.iter().map(|listing| &listing.message));
    let unread_banner = if unread > 0 {
        format!(r#"<p class="muted">You have {unread} unread messages</p>"#)
    } else {
        String::new()
    };

    let inbox_items = render_items(&inbox, "From", "You have no messages");
    let sent_items = render_items(&sent, "To", "You have not sent any messages");

    Ok(Html(res::layout(
        Some(&viewer),
        "Messages",
        &include_res!(str, "/pages/messages/list.html")
            .replace("{unread_banner}", &unread_banner)
            .replace("{inbox_items}", &inbox_items)
            .replace("{sent_items}", &sent_items),
    ))
    .into_response())
}

fn render_items(listings: &[MessageListing], direction: &str, empty: &str) -> String {
    if listings.is_empty() {
        return format!(r#"<p class="empty">{empty}</p>"#);
    }

    listings
        .iter()
        .map(|MessageListing { message, party }| {
            let party = if message.is_broadcast && direction == "To" {
                "All volunteers"
            } else {
                party.label()
            };
            include_res!(str, "/pages/messages/item.html")
                .replace("{id}", &message.id.to_string())
                .replace("{class}", if message.read_at.is_none() { "item unread" } else { "item" })
                .replace("{subject}", &res::escape(&message.subject))
                .replace(
                    "{broadcast_badge}",
                    if message.is_broadcast { r#"<span class="badge">Broadcast</span>"# } else { "" },
                )
                .replace("{direction}", direction)
                .replace("{party}", &res::escape(party))
                .replace("{preview}", &res::escape(&preview(&message.content)))
                .replace("{created_at}", &res::datetime(message.created_at))
        })
        .collect()
}

fn preview(content: &str) -> String {
    const LIMIT: usize = 140;
    match content.char_indices().nth(LIMIT) {
        Some((cut, _)) => format!("{}…", &content[..cut]),
        None => content.to_owned(),
    }
}
