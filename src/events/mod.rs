mod detail;
mod list;
mod new;
pub mod store;

use axum::{routing::get, Router};

use crate::{db::{activity_label, EventWithOrganiser}, include_res, res, AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list::events))
        .route("/new", get(new::new_event_page).post(new::new_event))
        .route("/{id}", get(detail::event))
}

pub(crate) fn render_cards(events: &[EventWithOrganiser], empty: &str) -> String {
    if events.is_empty() {
        return format!(r#"<p class="empty">{empty}</p>"#);
    }

    events
        .iter()
        .map(|EventWithOrganiser { event, organiser }| {
            let activity = event
                .activity_type
                .as_deref()
                .map(|activity| format!(r#"<span class="badge">{}</span>"#, res::escape(activity_label(activity))))
                .unwrap_or_default();
            let duration = event
                .duration_hours
                .map(|hours| format!("{hours} hours"))
                .unwrap_or_default();

            include_res!(str, "/pages/events/card.html")
                .replace("{id}", &event.id.to_string())
                .replace("{title}", &res::escape(&event.title))
                .replace("{activity}", &activity)
                .replace("{center_name}", &res::escape(&event.center_name))
                .replace("{location}", &res::escape(&event.location))
                .replace("{scheduled_date}", &res::datetime(event.scheduled_date))
                .replace("{duration}", &duration)
                .replace("{organiser}", &res::escape(organiser.label()))
        })
        .collect()
}
