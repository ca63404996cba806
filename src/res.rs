use pulldown_cmark::{CowStr, Event, Options, Parser, Tag};
use time::{macros::format_description, Date, OffsetDateTime};

use crate::auth::Viewer;

#[macro_export]
macro_rules! include_res {
    (bytes, $p:expr) => {
        include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/res", $p))
    };
    (str, $p:expr) => {
        include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/res", $p))
    };
}

/// Escapes text for an HTML body or a double-quoted attribute.
/// Braces are encoded too so user text never reads as a template placeholder.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    pulldown_cmark::html::push_html(&mut out, std::iter::once(Event::Text(CowStr::from(text))));
    out.replace('"', "&quot;")
        .replace('\'', "&#39;")
        .replace('{', "&#123;")
        .replace('}', "&#125;")
}

/// Renders user-written Markdown. Raw HTML is shown as text, never interpreted,
/// and link or image targets outside http, https and mailto become `#`.
pub fn markdown(content: &str) -> String {
    let parser = Parser::new_ext(content, Options::ENABLE_STRIKETHROUGH).map(|event| match event {
        Event::Html(html) | Event::InlineHtml(html) => Event::Text(html),
        Event::Start(Tag::Link { link_type, dest_url, title, id }) => Event::Start(Tag::Link {
            link_type,
            dest_url: safe_url(dest_url),
            title,
            id,
        }),
        Event::Start(Tag::Image { link_type, dest_url, title, id }) => Event::Start(Tag::Image {
            link_type,
            dest_url: safe_url(dest_url),
            title,
            id,
        }),
        _ => event,
    });

    let mut html_output = String::new();
    pulldown_cmark::html::push_html(&mut html_output, parser);
    html_output
}

/// Keeps relative targets and the http, https and mailto schemes.
fn safe_url(url: CowStr<'_>) -> CowStr<'_> {
    // browsers ignore whitespace and control characters inside a scheme
    let compact: String = url
        .chars()
        .filter(|c| !c.is_ascii_whitespace() && !c.is_control())
        .collect();

    match compact.find([':', '/', '?', '#']) {
        Some(end) if compact[end..].starts_with(':') => {
            match compact[..end].to_ascii_lowercase().as_str() {
                "http" | "https" | "mailto" => url,
                _ => CowStr::Borrowed("#"),
            }
        }
        _ => url,
    }
}

pub fn datetime(at: OffsetDateTime) -> String {
    at.format(format_description!("[year]-[month]-[day] [hour]:[minute]"))
        .unwrap_or_default()
}

pub fn date(date: Date) -> String {
    date.format(format_description!("[year]-[month]-[day]"))
        .unwrap_or_default()
}

/// Only same-site absolute paths survive; anything else becomes `fallback`.
pub fn safe_return_url<'a>(candidate: Option<&'a str>, fallback: &'a str) -> &'a str {
    match candidate {
        Some(url) if url.starts_with('/') && !url.starts_with("//") && !url.contains('\\') => url,
        _ => fallback,
    }
}

pub fn sorry(what: &str) -> String {
    layout(
        None,
        "Not found",
        &include_res!(str, "/pages/sorry.html").replace("{what}", &escape(what)),
    )
}

pub fn layout(viewer: Option<&Viewer>, title: &str, content: &str) -> String {
    let nav = match viewer {
        Some(viewer) => include_res!(str, "/pages/nav.html")
            .replace("{name}", &escape(viewer.display_name()))
            .replace(
                "{admin_badge}",
                if viewer.is_admin() { r#"<span class="badge">Admin</span>"# } else { "" },
            ),
        None => String::new(),
    };

    include_res!(str, "/pages/layout.html")
        .replace("{title}", &escape(title))
        .replace("{nav}", &nav)
        .replace("{content}", content)
}

/// `<option>` list with `selected` set on the matching value.
pub fn options<'a>(values: impl IntoIterator<Item = (&'a str, &'a str)>, selected: Option<&str>) -> String {
    values
        .into_iter()
        .map(|(value, label)| {
            format!(
                r#"<option value="{}"{}>{}</option>"#,
                escape(value),
                if Some(value) == selected { " selected" } else { "" },
                escape(label),
            )
        })
        .collect()
}

/// Banner for a failed submission, empty when there is nothing to report.
pub fn error_banner(error: Option<&str>) -> String {
    error
        .map(|error| format!(r#"<div class="error">{}</div>"#, escape(error)))
        .unwrap_or_default()
}
