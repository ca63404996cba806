mod detail;
mod list;
mod new;
pub mod store;

use axum::{routing::get, Router};

use crate::{db::{activity_label, ReportWithAuthor}, include_res, res, AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list::reports))
        .route("/new", get(new::new_report_page).post(new::new_report))
        .route("/{id}", get(detail::report))
}

pub(crate) fn render_cards(reports: &[ReportWithAuthor], empty: &str) -> String {
    if reports.is_empty() {
        return format!(r#"<p class="empty">{empty}</p>"#);
    }

    reports
        .iter()
        .map(|ReportWithAuthor { report, author }| {
            include_res!(str, "/pages/reports/card.html")
                .replace("{id}", &report.id.to_string())
                .replace("{center_name}", &res::escape(&report.center_name))
                .replace("{activity}", &res::escape(activity_label(&report.activity_type)))
                .replace("{author}", &res::escape(author.label()))
                .replace("{location}", &res::escape(&report.location))
                .replace("{visit_date}", &res::date(report.visit_date))
                .replace("{duration_hours}", &report.duration_hours.to_string())
                .replace("{children_count}", &report.children_count.to_string())
        })
        .collect()
}
