use axum::{
    debug_handler,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use sqlx::SqlitePool;
use time::{macros::format_description, PrimitiveDateTime};

use crate::{auth::Viewer, db::ACTIVITY_TYPES, include_res, res, AppResult, AppState};

use super::store::{self, NewEvent};

#[derive(Debug, Default, Deserialize)]
pub(crate) struct NewEventForm {
    pub(crate) title: String,
    #[serde(default)]
    pub(crate) description: String,
    pub(crate) center_name: String,
    pub(crate) location: String,
    pub(crate) scheduled_date: String,
    #[serde(default)]
    pub(crate) duration_hours: String,
    #[serde(default)]
    pub(crate) activity_type: String,
}

fn required<'a>(value: &'a str, message: &'static str) -> Result<&'a str, &'static str> {
    match value.trim() {
        "" => Err(message),
        value => Ok(value),
    }
}

fn optional(value: &str) -> Option<&str> {
    Some(value.trim()).filter(|value| !value.is_empty())
}

impl NewEventForm {
    pub(crate) fn validate(&self, organiser: &Viewer) -> Result<NewEvent, &'static str> {
        let title = required(&self.title, "Title is required")?;
        let center_name = required(&self.center_name, "Center name is required")?;
        let location = required(&self.location, "Location is required")?;

        // datetime-local inputs carry no offset; scheduling is kept in UTC
        let scheduled_date = PrimitiveDateTime::parse(
            required(&self.scheduled_date, "Date and time are required")?,
            format_description!("[year]-[month]-[day]T[hour]:[minute]"),
        )
        .map_err(|_| "Date and time are not valid")?
        .assume_utc();

        let duration_hours = match optional(&self.duration_hours) {
            None => None,
            Some(hours) => match hours.parse::<f64>() {
                Ok(hours) if hours.is_finite() && hours > 0.0 => Some(hours),
                _ => return Err("Duration must be a number of hours"),
            },
        };

        let activity_type = optional(&self.activity_type);
        if activity_type.is_some_and(|activity| !ACTIVITY_TYPES.contains(&activity)) {
            return Err("Unknown activity type");
        }

        Ok(NewEvent {
            title: title.to_owned(),
            description: optional(&self.description).map(str::to_owned),
            center_name: center_name.to_owned(),
            location: location.to_owned(),
            scheduled_date,
            duration_hours,
            activity_type: activity_type.map(str::to_owned),
            created_by: organiser.id,
        })
    }
}

#[debug_handler(state = AppState)]
pub(crate) async fn new_event_page(viewer: Viewer) -> AppResult<Response> {
    Ok(render_form(&viewer, &NewEventForm::default(), None, StatusCode::OK))
}

#[debug_handler(state = AppState)]
pub(crate) async fn new_event(
    viewer: Viewer,
    State(db_pool): State<SqlitePool>,
    Form(form): Form<NewEventForm>,
) -> AppResult<Response> {
    let new = match form.validate(&viewer) {
        Ok(new) => new,
        Err(error) => return Ok(render_form(&viewer, &form, Some(error), StatusCode::BAD_REQUEST)),
    };

    match store::insert_event(&db_pool, new).await {
        Ok(event) => {
            tracing::info!(event_id = %event.id, organiser_id = %viewer.id, "event scheduled");
            Ok(Redirect::to(&format!("/dashboard/events/{}", event.id)).into_response())
        }
        Err(err) => {
            tracing::error!(error = ?err, organiser_id = %viewer.id, "event insert failed");
            Ok(render_form(
                &viewer,
                &form,
                Some("The event could not be saved. Please try again."),
                StatusCode::INTERNAL_SERVER_ERROR,
            ))
        }
    }
}

fn render_form(viewer: &Viewer, form: &NewEventForm, error: Option<&str>, status: StatusCode) -> Response {
    let activity_options = res::options(
        std::iter::once(("", "Not specified")).chain(ACTIVITY_TYPES.iter().map(|activity| (*activity, *activity))),
        Some(form.activity_type.as_str()),
    );

    let body = include_res!(str, "/pages/events/new.html")
        .replace("{error}", &res::error_banner(error))
        .replace("{activity_options}", &activity_options)
        .replace("{title}", &res::escape(&form.title))
        .replace("{center_name}", &res::escape(&form.center_name))
        .replace("{location}", &res::escape(&form.location))
        .replace("{scheduled_date}", &res::escape(&form.scheduled_date))
        .replace("{duration_hours}", &res::escape(&form.duration_hours))
        .replace("{description}", &res::escape(&form.description));

    (status, Html(res::layout(Some(viewer), "New event", &body))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Role;
    use uuid::Uuid;

    fn organiser() -> Viewer {
        Viewer {
            id: Uuid::now_v7(),
            email: "c@example.org".into(),
            full_name: None,
            role: Role::Admin,
        }
    }

    fn filled() -> NewEventForm {
        NewEventForm {
            title: "Spring workshop".into(),
            description: String::new(),
            center_name: "Casa Soarelui".into(),
            location: "Cluj-Napoca".into(),
            scheduled_date: "2026-04-18T10:30".into(),
            duration_hours: String::new(),
            activity_type: String::new(),
        }
    }

    #[test]
    fn minimal_event_is_accepted() {
        let c = organiser();
        let event = filled().validate(&c).unwrap();
        assert_eq!(event.scheduled_date, time::macros::datetime!(2026-04-18 10:30 UTC));
        assert_eq!(event.created_by, c.id);
        assert_eq!(event.description, None);
        assert_eq!(event.duration_hours, None);
        assert_eq!(event.activity_type, None);
    }

    #[test]
    fn optional_fields_are_still_checked() {
        let c = organiser();

        let mut form = filled();
        form.duration_hours = "-2".into();
        assert_eq!(form.validate(&c).unwrap_err(), "Duration must be a number of hours");

        let mut form = filled();
        form.activity_type = "Knitting".into();
        assert_eq!(form.validate(&c).unwrap_err(), "Unknown activity type");

        let mut form = filled();
        form.activity_type = ACTIVITY_TYPES[0].into();
        form.duration_hours = "3".into();
        let event = form.validate(&c).unwrap();
        assert_eq!(event.duration_hours, Some(3.0));
        assert_eq!(event.activity_type.as_deref(), Some(ACTIVITY_TYPES[0]));
    }

    #[test]
    fn schedule_must_parse() {
        let c = organiser();
        let mut form = filled();
        form.scheduled_date = "tomorrow".into();
        assert_eq!(form.validate(&c).unwrap_err(), "Date and time are not valid");

        form.scheduled_date = " ".into();
        assert_eq!(form.validate(&c).unwrap_err(), "Date and time are required");
    }
}
