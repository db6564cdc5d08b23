use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Json, Response},
};
use chrono::{DateTime, FixedOffset, Utc};
use serde::Deserialize;
use serde_json::json;

use crate::{
    error::{AppError, AppResult},
    models::{AnalyticsReport, UnifiedOrder},
    render::{self, fmt2},
    services::analytics_service,
    table::{OrderColumn, SortDirection, TableAction, TablePage, TableState},
    AppState,
};

#[derive(Debug, Default, Deserialize)]
pub struct WindowQuery {
    pub start: Option<String>,
    pub end: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct OrdersQuery {
    pub start: Option<String>,
    pub end: Option<String>,
    pub search: Option<String>,
    pub sort: Option<String>,
    pub dir: Option<String>,
    pub page: Option<usize>,
    pub page_size: Option<usize>,
}

fn window(
    state: &AppState,
    start: Option<&str>,
    end: Option<&str>,
) -> AppResult<(DateTime<FixedOffset>, DateTime<FixedOffset>)> {
    let offset = state.settings.report_offset;
    let today = Utc::now().with_timezone(&offset).date_naive();
    analytics_service::resolve_window(start, end, offset, today)
}

async fn report_for(
    state: &AppState,
    restaurant_id: &str,
    start: Option<&str>,
    end: Option<&str>,
) -> AppResult<AnalyticsReport> {
    let (start, end) = window(state, start, end)?;
    let store = state.store.as_ref();
    analytics_service::build_report(store, &state.settings, restaurant_id, start, end).await
}

// GET /api/restaurants/:restaurant_id/analytics
pub async fn get_analytics(
    State(state): State<AppState>,
    Path(restaurant_id): Path<String>,
    Query(q): Query<WindowQuery>,
) -> AppResult<Json<AnalyticsReport>> {
    let report = report_for(&state, &restaurant_id, q.start.as_deref(), q.end.as_deref()).await?;
    Ok(Json(report))
}

fn table_state(q: &OrdersQuery) -> AppResult<TableState<OrderColumn>> {
    let mut actions: Vec<TableAction<OrderColumn>> = vec![];

    if let Some(search) = q.search.as_deref() {
        actions.push(TableAction::SetSearch(search.to_string()));
    }
    if let Some(sort) = q.sort.as_deref().filter(|s| !s.trim().is_empty()) {
        let column = OrderColumn::parse(sort)
            .ok_or_else(|| AppError::Validation(format!("Unknown sort column: {sort}")))?;
        let dir = match q.dir.as_deref() {
            Some(d) => SortDirection::parse(d)
                .ok_or_else(|| AppError::Validation(format!("Unknown sort direction: {d}")))?,
            None => SortDirection::Asc,
        };
        actions.push(TableAction::SetSort(column, dir));
    }
    if let Some(size) = q.page_size {
        actions.push(TableAction::SetPageSize(size));
    }
    // page goes last: the other actions reset it
    if let Some(page) = q.page {
        actions.push(TableAction::GoToPage(page));
    }

    Ok(actions
        .into_iter()
        .fold(TableState::default(), TableState::reduce))
}

// GET /api/restaurants/:restaurant_id/orders
pub async fn get_orders(
    State(state): State<AppState>,
    Path(restaurant_id): Path<String>,
    Query(q): Query<OrdersQuery>,
) -> AppResult<Json<TablePage<UnifiedOrder>>> {
    let table = table_state(&q)?;
    let report = report_for(&state, &restaurant_id, q.start.as_deref(), q.end.as_deref()).await?;
    Ok(Json(table.apply(&report.orders)))
}

fn dashboard_context(
    restaurant_id: &str,
    start: &str,
    end: &str,
    report: &AnalyticsReport,
) -> serde_json::Value {
    let k = &report.metrics.kpis;
    let charts = &report.metrics.charts;

    let peak_max = charts
        .peak_hours
        .iter()
        .map(|p| p.value)
        .fold(0.0_f64, f64::max);

    let peak_hours: Vec<serde_json::Value> = charts
        .peak_hours
        .iter()
        .map(|p| {
            let pct = if peak_max > 0.0 { (p.value / peak_max) * 100.0 } else { 0.0 };
            json!({ "name": p.name, "value": fmt2(p.value), "pct": format!("{:.0}", pct) })
        })
        .collect();

    json!({
        "restaurant_id": restaurant_id,
        "start": start,
        "end": end,
        "incomplete": report.incomplete_sessions.len(),
        "kpis": {
            "total_sales": fmt2(k.total_sales),
            "avg_ticket": fmt2(k.avg_ticket),
            "total_tips": fmt2(k.total_tips),
            "active_tables": k.active_tables,
            "active_pickup": k.active_pickup,
            "closed_orders": k.closed_orders,
        },
        "sales_history": charts.sales_history.iter()
            .map(|p| json!({ "name": p.name, "value": fmt2(p.value) }))
            .collect::<Vec<_>>(),
        "payments": charts.payments.iter()
            .map(|p| json!({ "name": p.name, "value": fmt2(p.value), "color": p.color }))
            .collect::<Vec<_>>(),
        "peak_hours": peak_hours,
        "top_products": report.top_products.iter()
            .map(|p| json!({ "name": p.name, "quantity": p.quantity, "revenue": fmt2(p.revenue) }))
            .collect::<Vec<_>>(),
    })
}

fn html(state: &AppState, headers: &HeaderMap, status: StatusCode, body: String) -> Response {
    match render::page_or_fragment(state, headers, "Dashboard", body) {
        Ok(page) => (status, Html(page)).into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, Html(e.to_string())).into_response(),
    }
}

// GET /restaurants/:restaurant_id/dashboard (SSR page or HTMX partial)
pub async fn get_dashboard(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(restaurant_id): Path<String>,
    Query(q): Query<WindowQuery>,
) -> Response {
    let result = match window(&state, q.start.as_deref(), q.end.as_deref()) {
        Ok((start, end)) => analytics_service::build_report(
            state.store.as_ref(),
            &state.settings,
            &restaurant_id,
            start,
            end,
        )
        .await
        .map(|report| (start, end, report)),
        Err(e) => Err(e),
    };

    let (status, body) = match result {
        Ok((start, end, report)) => {
            let ctx = dashboard_context(
                &restaurant_id,
                &start.format("%Y-%m-%d").to_string(),
                &end.format("%Y-%m-%d").to_string(),
                &report,
            );
            match state.hbs.render("pages/dashboard", &ctx) {
                Ok(s) => (StatusCode::OK, s),
                Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, format!("template error: {e}")),
            }
        }
        Err(e) => {
            tracing::warn!(restaurant_id = %restaurant_id, error = %e, "dashboard unavailable");
            let banner = state
                .hbs
                .render("partials/dashboard_error", &json!({ "message": e.to_string() }))
                .unwrap_or_else(|err| format!("template error: {err}"));
            (e.status(), banner)
        }
    };

    html(&state, &headers, status, body)
}
