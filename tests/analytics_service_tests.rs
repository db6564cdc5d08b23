mod common;

use std::sync::{atomic::Ordering, Mutex};

use chrono::{FixedOffset, NaiveDate};
use common::{at, item, payment, pickup, session, test_settings, ts, MemoryStore};
use kitos::{
    config::{PaymentFailurePolicy, Settings},
    error::AppError,
    models::{OrderStatus, SourceType},
    services::analytics_service::{build_report, resolve_window},
};

fn populated_store() -> MemoryStore {
    let mut s1 = session("s1", "r1", "closed", ts(2024, 5, 1, 10, 0), 50.0);
    s1.items = vec![item("p1", "Burger", 2.0, 25.0)];

    MemoryStore {
        sessions: vec![
            s1,
            session("s2", "r1", "closed", ts(2024, 5, 1, 14, 0), 30.0),
            session("s3", "r1", "open", ts(2024, 5, 1, 19, 0), 12.0),
            // other restaurant
            session("x1", "r2", "closed", ts(2024, 5, 1, 10, 0), 999.0),
            // outside the window
            session("s4", "r1", "closed", ts(2024, 5, 2, 10, 0), 999.0),
        ],
        payments: vec![
            payment("pay1", "s1", "cash", 50.0, 5.0),
            payment("pay2", "s2", "stripe", 30.0, 3.0),
            payment("pay3", "s3", "visa", 6.0, 1.0),
        ],
        pickup_orders: Mutex::new(vec![
            pickup("o1", "r1", "completed", ts(2024, 5, 1, 12, 0), 20.0, Some("pi_1")),
            pickup("o2", "r1", "preparing", ts(2024, 5, 1, 18, 0), 15.0, None),
            pickup("o3", "r1", "cancelled", ts(2024, 5, 1, 13, 0), 45.0, Some("pi_3")),
        ]),
        ..Default::default()
    }
}

#[tokio::test]
async fn report_merges_dine_in_and_takeout() {
    let store = populated_store();
    let settings = test_settings();

    let report = build_report(&store, &settings, "r1", at("2024-05-01T00:00:00Z"), at("2024-05-01T23:59:59Z"))
        .await
        .unwrap();

    let ids: Vec<&str> = report.orders.iter().map(|o| o.id.as_str()).collect();
    assert_eq!(ids, vec!["s1", "s2", "s3", "o1", "o2", "o3"]);

    let dine_in = report.orders.iter().filter(|o| o.source_type == SourceType::DineIn).count();
    assert_eq!(dine_in, 3);

    let k = &report.metrics.kpis;
    assert_eq!(k.total_sales, 50.0 + 30.0 + 20.0);
    assert_eq!(k.closed_orders, 4);
    assert_eq!(k.avg_ticket, 100.0 / 4.0);
    assert_eq!(k.total_tips, 9.0);
    assert_eq!(k.active_tables, 1);
    assert_eq!(k.active_pickup, 1);

    let payments: Vec<f64> = report.metrics.charts.payments.iter().map(|p| p.value).collect();
    // cash 50; card 6 + sentinel 1; app 30 + 20 + 0 (cancelled)
    assert_eq!(payments, vec![50.0, 7.0, 50.0]);

    assert_eq!(report.top_products.len(), 1);
    assert_eq!(report.top_products[0].name, "Burger");
    assert!(report.incomplete_sessions.is_empty());

    // one payment lookup per session in the window
    assert_eq!(store.payment_calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn failed_payment_fetch_is_skipped_by_default() {
    let mut store = populated_store();
    store.broken_payment_sessions.insert("s2".to_string());
    let settings = test_settings();
    assert_eq!(settings.payment_failure_policy, PaymentFailurePolicy::Skip);

    let report = build_report(&store, &settings, "r1", at("2024-05-01T00:00:00Z"), at("2024-05-01T23:59:59Z"))
        .await
        .unwrap();

    assert_eq!(report.incomplete_sessions, vec!["s2".to_string()]);

    let s2 = report.orders.iter().find(|o| o.id == "s2").unwrap();
    assert_eq!(s2.status, OrderStatus::Closed);
    assert_eq!(s2.total, 30.0);
    assert_eq!(s2.tips, 0.0);
    assert_eq!(s2.payment_methods.sum(), 0.0);

    // the other sessions are unaffected
    assert_eq!(report.metrics.kpis.total_tips, 6.0);
    assert_eq!(report.metrics.kpis.total_sales, 100.0);
}

#[tokio::test]
async fn failed_payment_fetch_aborts_when_configured() {
    let mut store = populated_store();
    store.broken_payment_sessions.insert("s2".to_string());
    let settings = Settings {
        payment_failure_policy: PaymentFailurePolicy::Abort,
        ..test_settings()
    };

    let err = build_report(&store, &settings, "r1", at("2024-05-01T00:00:00Z"), at("2024-05-01T23:59:59Z"))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Database(_)));
}

#[tokio::test]
async fn transient_session_fetch_failures_are_retried() {
    let store = populated_store();
    store.session_failures.store(2, Ordering::SeqCst);
    let settings = test_settings();

    let report = build_report(&store, &settings, "r1", at("2024-05-01T00:00:00Z"), at("2024-05-01T23:59:59Z"))
        .await
        .unwrap();

    assert_eq!(report.orders.len(), 6);
    assert_eq!(store.session_calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn retries_are_bounded() {
    let store = populated_store();
    store.session_failures.store(5, Ordering::SeqCst);
    let settings = Settings {
        fetch_retries: 1,
        ..test_settings()
    };

    let err = build_report(&store, &settings, "r1", at("2024-05-01T00:00:00Z"), at("2024-05-01T23:59:59Z"))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Database(_)));
    assert_eq!(store.session_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn fan_out_respects_concurrency_of_one() {
    let store = populated_store();
    let settings = Settings {
        payment_fetch_concurrency: 1,
        ..test_settings()
    };

    let report = build_report(&store, &settings, "r1", at("2024-05-01T00:00:00Z"), at("2024-05-01T23:59:59Z"))
        .await
        .unwrap();

    let ids: Vec<&str> = report.orders.iter().take(3).map(|o| o.id.as_str()).collect();
    assert_eq!(ids, vec!["s1", "s2", "s3"]);
    assert_eq!(report.metrics.kpis.total_tips, 9.0);
}

#[tokio::test]
async fn empty_restaurant_yields_zero_report() {
    let store = MemoryStore::default();
    let settings = test_settings();

    let report = build_report(&store, &settings, "nobody", at("2024-05-01T00:00:00Z"), at("2024-05-01T23:59:59Z"))
        .await
        .unwrap();

    assert!(report.orders.is_empty());
    assert_eq!(report.metrics.kpis.total_sales, 0.0);
    assert_eq!(report.metrics.charts.peak_hours.len(), 24);
}

#[tokio::test]
async fn rejects_blank_restaurant_and_inverted_window() {
    let store = MemoryStore::default();
    let settings = test_settings();

    let err = build_report(&store, &settings, "  ", at("2024-05-01T00:00:00Z"), at("2024-05-01T23:59:59Z"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let err = build_report(&store, &settings, "r1", at("2024-05-02T00:00:00Z"), at("2024-05-01T00:00:00Z"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[test]
fn window_defaults_to_today_in_offset() {
    let offset = FixedOffset::east_opt(2 * 3600).unwrap();
    let today = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();

    let (start, end) = resolve_window(None, None, offset, today).unwrap();

    assert_eq!(start.to_rfc3339(), "2024-05-01T00:00:00+02:00");
    assert_eq!(end.format("%Y-%m-%d %H:%M:%S%.3f").to_string(), "2024-05-01 23:59:59.999");
}

#[test]
fn window_accepts_dates_and_rfc3339() {
    let offset = FixedOffset::east_opt(0).unwrap();
    let today = NaiveDate::from_ymd_opt(2024, 5, 20).unwrap();

    let (start, end) = resolve_window(Some("2024-05-01"), Some("2024-05-10T12:00:00+02:00"), offset, today).unwrap();

    assert_eq!(start.to_rfc3339(), "2024-05-01T00:00:00+00:00");
    assert_eq!(end.to_rfc3339(), "2024-05-10T10:00:00+00:00");
}

#[test]
fn window_rejects_garbage_and_inverted_bounds() {
    let offset = FixedOffset::east_opt(0).unwrap();
    let today = NaiveDate::from_ymd_opt(2024, 5, 20).unwrap();

    assert!(matches!(
        resolve_window(Some("yesterday"), None, offset, today),
        Err(AppError::Validation(_))
    ));
    assert!(matches!(
        resolve_window(Some("2024-05-10"), Some("2024-05-01"), offset, today),
        Err(AppError::Validation(_))
    ));
}
