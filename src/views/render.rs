use axum::http::HeaderMap;
use serde_json::json;

use crate::{error::AppResult, AppState};

pub fn is_htmx(headers: &HeaderMap) -> bool {
    headers
        .get("HX-Request")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

pub fn fmt2(v: f64) -> String {
    format!("{:.2}", v)
}

pub fn render_full(state: &AppState, title: &str, body_html: String) -> AppResult<String> {
    let ctx = json!({
        "title": title,
        "body": body_html,
    });

    Ok(state.hbs.render("layouts/base", &ctx)?)
}

/// HTMX requests get the fragment, everything else the full page.
pub fn page_or_fragment(
    state: &AppState,
    headers: &HeaderMap,
    title: &str,
    body_html: String,
) -> AppResult<String> {
    if is_htmx(headers) {
        return Ok(body_html);
    }
    render_full(state, title, body_html)
}
