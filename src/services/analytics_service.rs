use std::{future::Future, time::Duration};

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};
use futures_util::{stream, StreamExt};
use tracing::{info, warn};

use crate::{
    config::{PaymentFailurePolicy, Settings},
    error::{AppError, AppResult},
    models::{AnalyticsReport, Payment, Session, UnifiedOrder},
};

use super::{metrics_service, normalizer, store::OrderStore};

/// Runs `op`, retrying database failures up to `settings.fetch_retries` times
/// with a linearly growing pause.
async fn with_retry<T, F, Fut>(settings: &Settings, what: &str, mut op: F) -> AppResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = AppResult<T>>,
{
    let mut attempt: u32 = 0;
    loop {
        match op().await {
            Ok(v) => return Ok(v),
            Err(e @ AppError::Database(_)) if attempt < settings.fetch_retries => {
                attempt += 1;
                warn!(what, attempt, error = %e, "fetch failed, retrying");
                let pause = settings.fetch_retry_delay_ms.saturating_mul(u64::from(attempt));
                tokio::time::sleep(Duration::from_millis(pause)).await;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Fetches every session's payments, at most `payment_fetch_concurrency` at a
/// time, and waits for all of them before normalizing.
///
/// Returns the dine-in orders in session order plus the ids of sessions
/// whose payments could not be fetched (empty under `Abort`, which fails
/// instead).
async fn normalize_sessions(
    store: &dyn OrderStore,
    settings: &Settings,
    sessions: &[Session],
) -> AppResult<(Vec<UnifiedOrder>, Vec<String>)> {
    let ids: Vec<String> = sessions.iter().map(|s| s.id.clone()).collect();
    let fetched: Vec<AppResult<Vec<Payment>>> = stream::iter(ids)
        .map(|id| async move { store.list_session_payments(&id).await })
        .buffered(settings.payment_fetch_concurrency.max(1))
        .collect()
        .await;

    let mut orders = Vec::with_capacity(fetched.len());
    let mut incomplete = vec![];

    for (session, res) in sessions.iter().zip(fetched) {
        let payments = match res {
            Ok(p) => p,
            Err(e) => match settings.payment_failure_policy {
                PaymentFailurePolicy::Abort => return Err(e),
                PaymentFailurePolicy::Skip => {
                    warn!(
                        session_id = %session.id,
                        error = %e,
                        "payments unavailable, counting session without them"
                    );
                    incomplete.push(session.id.clone());
                    vec![]
                }
            },
        };
        orders.push(normalizer::normalize_session(session, &payments));
    }

    Ok((orders, incomplete))
}

pub async fn build_report(
    store: &dyn OrderStore,
    settings: &Settings,
    restaurant_id: &str,
    start: DateTime<FixedOffset>,
    end: DateTime<FixedOffset>,
) -> AppResult<AnalyticsReport> {
    let restaurant_id = restaurant_id.trim();
    if restaurant_id.is_empty() {
        return Err(AppError::Validation("Missing restaurant id.".into()));
    }
    if start > end {
        return Err(AppError::Validation("Start date must not be after end date.".into()));
    }

    let (from, to) = (start.timestamp(), end.timestamp());

    let (sessions, pickups) = tokio::try_join!(
        with_retry(settings, "sessions", || store.list_sessions(restaurant_id, from, to)),
        with_retry(settings, "pickup_orders", || store.list_pickup_orders(restaurant_id, from, to)),
    )?;

    let (mut orders, incomplete_sessions) = normalize_sessions(store, settings, &sessions).await?;
    orders.extend(
        pickups
            .iter()
            .map(|o| normalizer::normalize_pickup_order(o, settings.no_intent_card_policy)),
    );

    let metrics = metrics_service::calculate_metrics(&orders, start, end);
    let top_products = metrics_service::top_products(&orders, settings.top_products_limit);

    info!(
        restaurant_id,
        sessions = sessions.len(),
        pickup_orders = pickups.len(),
        incomplete = incomplete_sessions.len(),
        "analytics report built"
    );

    Ok(AnalyticsReport {
        orders,
        metrics,
        top_products,
        incomplete_sessions,
    })
}

fn parse_bound(
    raw: &str,
    offset: FixedOffset,
    end_of_day: bool,
) -> AppResult<DateTime<FixedOffset>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&offset));
    }

    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| AppError::Validation(format!("Invalid date: {raw}")))?;
    day_bound(date, offset, end_of_day)
}

fn day_bound(
    date: NaiveDate,
    offset: FixedOffset,
    end_of_day: bool,
) -> AppResult<DateTime<FixedOffset>> {
    let time = if end_of_day {
        NaiveTime::from_hms_milli_opt(23, 59, 59, 999)
    } else {
        NaiveTime::from_hms_opt(0, 0, 0)
    }
    .ok_or_else(|| AppError::Internal("invalid time of day".into()))?;

    date.and_time(time)
        .and_local_timezone(offset)
        .single()
        .ok_or_else(|| AppError::Validation(format!("Date out of range: {date}")))
}

/// Resolves the `start`/`end` query parameters into a report window.
///
/// Each bound is RFC 3339 or a plain `YYYY-MM-DD` (start of day for `start`,
/// last millisecond for `end`). A missing bound falls back to `today`.
pub fn resolve_window(
    start: Option<&str>,
    end: Option<&str>,
    offset: FixedOffset,
    today: NaiveDate,
) -> AppResult<(DateTime<FixedOffset>, DateTime<FixedOffset>)> {
    let start = match start.filter(|s| !s.trim().is_empty()) {
        Some(s) => parse_bound(s, offset, false)?,
        None => day_bound(today, offset, false)?,
    };
    let end = match end.filter(|s| !s.trim().is_empty()) {
        Some(s) => parse_bound(s, offset, true)?,
        None => day_bound(today, offset, true)?,
    };

    if start > end {
        return Err(AppError::Validation("Start date must not be after end date.".into()));
    }
    Ok((start, end))
}
