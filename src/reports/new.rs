use axum::{
    debug_handler,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use sqlx::SqlitePool;
use time::{macros::format_description, Date};
use uuid::Uuid;

use crate::{
    auth::Viewer,
    db::ACTIVITY_TYPES,
    events,
    include_res,
    res,
    AppResult, AppState,
};

use super::store::{self, NewReport};

#[derive(Debug, Default, Deserialize)]
pub(crate) struct NewReportForm {
    #[serde(default)]
    pub(crate) event_id: String,
    pub(crate) email: String,
    pub(crate) visit_date: String,
    pub(crate) duration_hours: String,
    pub(crate) center_name: String,
    pub(crate) location: String,
    pub(crate) activity_type: String,
    pub(crate) children_count: String,
    pub(crate) children_names: String,
    pub(crate) activity_description: String,
    #[serde(default)]
    pub(crate) testimonials: String,
    #[serde(default)]
    pub(crate) child_observations: String,
}

fn required<'a>(value: &'a str, message: &'static str) -> Result<&'a str, &'static str> {
    match value.trim() {
        "" => Err(message),
        value => Ok(value),
    }
}

fn optional(value: &str) -> Option<String> {
    Some(value.trim()).filter(|value| !value.is_empty()).map(str::to_owned)
}

impl NewReportForm {
    pub(crate) fn validate(&self, volunteer: &Viewer) -> Result<NewReport, &'static str> {
        let email = required(&self.email, "Email is required")?;
        if !email.contains('@') {
            return Err("Email is not valid");
        }

        let visit_date = Date::parse(
            required(&self.visit_date, "Visit date is required")?,
            format_description!("[year]-[month]-[day]"),
        )
        .map_err(|_| "Visit date is not valid")?;

        let duration_hours: f64 = required(&self.duration_hours, "Duration is required")?
            .parse()
            .map_err(|_| "Duration must be a number of hours")?;
        if !duration_hours.is_finite() || duration_hours <= 0.0 {
            return Err("Duration must be a number of hours");
        }

        let children_count: i64 = required(&self.children_count, "Number of children is required")?
            .parse()
            .map_err(|_| "Number of children must be a whole number")?;
        if children_count < 0 {
            return Err("Number of children must be a whole number");
        }

        let activity_type = required(&self.activity_type, "Activity type is required")?;
        if !ACTIVITY_TYPES.contains(&activity_type) {
            return Err("Unknown activity type");
        }

        let event_id = match self.event_id.trim() {
            "" => None,
            id => Some(Uuid::parse_str(id).map_err(|_| "Event not found")?),
        };

        Ok(NewReport {
            event_id,
            volunteer_id: volunteer.id,
            email: email.to_owned(),
            visit_date,
            duration_hours,
            center_name: required(&self.center_name, "Center name is required")?.to_owned(),
            location: required(&self.location, "Location is required")?.to_owned(),
            activity_type: activity_type.to_owned(),
            children_count,
            children_names: required(&self.children_names, "Children's names are required")?.to_owned(),
            activity_description: required(&self.activity_description, "Activity description is required")?
                .to_owned(),
            testimonials: optional(&self.testimonials),
            child_observations: optional(&self.child_observations),
        })
    }
}

#[debug_handler(state = AppState)]
pub(crate) async fn new_report_page(
    viewer: Viewer,
    State(db_pool): State<SqlitePool>,
) -> AppResult<Response> {
    let form = NewReportForm {
        email: viewer.email.clone(),
        ..Default::default()
    };
    render_form(&db_pool, &viewer, &form, None, StatusCode::OK).await
}

#[debug_handler(state = AppState)]
pub(crate) async fn new_report(
    viewer: Viewer,
    State(db_pool): State<SqlitePool>,
    Form(form): Form<NewReportForm>,
) -> AppResult<Response> {
    let new = match form.validate(&viewer) {
        Ok(new) => new,
        Err(error) => return render_form(&db_pool, &viewer, &form, Some(error), StatusCode::BAD_REQUEST).await,
    };

    if let Some(event_id) = new.event_id {
        if events::store::find_event(&db_pool, event_id).await?.is_none() {
            return render_form(&db_pool, &viewer, &form, Some("Event not found"), StatusCode::BAD_REQUEST).await;
        }
    }

    match store::insert_report(&db_pool, new).await {
        Ok(report) => {
            tracing::info!(report_id = %report.id, volunteer_id = %viewer.id, "visit report submitted");
            Ok(Redirect::to("/dashboard/reports").into_response())
        }
        Err(err) => {
            tracing::error!(error = ?err, volunteer_id = %viewer.id, "visit report insert failed");
            render_form(
                &db_pool,
                &viewer,
                &form,
                Some("The report could not be saved. Please try again."),
                StatusCode::INTERNAL_SERVER_ERROR,
            )
            .await
        }
    }
}

async fn render_form(
    db_pool: &SqlitePool,
    viewer: &Viewer,
    form: &NewReportForm,
    error: Option<&str>,
    status: StatusCode,
) -> AppResult<Response> {
    let events = events::store::list_choices(db_pool).await?;
    let event_ids: Vec<String> = events.iter().map(|event| event.id.to_string()).collect();
    let event_labels: Vec<String> = events
        .iter()
        .map(|event| format!("{} ({})", event.title, res::date(event.scheduled_date.date())))
        .collect();
    let event_options = res::options(
        std::iter::once(("", "None"))
            .chain(event_ids.iter().map(String::as_str).zip(event_labels.iter().map(String::as_str))),
        Some(form.event_id.as_str()),
    );

    let activity_options = res::options(
        ACTIVITY_TYPES.iter().map(|activity| (*activity, *activity)),
        Some(form.activity_type.as_str()),
    );

    let body = include_res!(str, "/pages/reports/new.html")
        .replace("{error}", &res::error_banner(error))
        .replace("{event_options}", &event_options)
        .replace("{activity_options}", &activity_options)
        .replace("{email}", &res::escape(&form.email))
        .replace("{visit_date}", &res::escape(&form.visit_date))
        .replace("{duration_hours}", &res::escape(&form.duration_hours))
        .replace("{center_name}", &res::escape(&form.center_name))
        .replace("{location}", &res::escape(&form.location))
        .replace("{children_count}", &res::escape(&form.children_count))
        .replace("{children_names}", &res::escape(&form.children_names))
        .replace("{activity_description}", &res::escape(&form.activity_description))
        .replace("{testimonials}", &res::escape(&form.testimonials))
        .replace("{child_observations}", &res::escape(&form.child_observations));

    Ok((status, Html(res::layout(Some(viewer), "New visit report", &body))).into_response())
}
