use std::env;

use chrono::{FixedOffset, Offset, Utc};

/// What to do when one session's payments can't be fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentFailurePolicy {
    /// Treat the session as having no payments and keep going.
    Skip,
    /// Fail the whole report.
    Abort,
}

impl PaymentFailurePolicy {
    fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "skip" => Some(Self::Skip),
            "abort" => Some(Self::Abort),
            _ => None,
        }
    }
}

/// How a takeout order without a payment intent fills `paymentMethods.Card`.
///
/// Historical data carries a fixed `1` there instead of a real amount. Until
/// that is settled the sentinel stays the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoIntentCardPolicy {
    Sentinel,
    OrderTotal,
    Zero,
}

impl NoIntentCardPolicy {
    fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "sentinel" => Some(Self::Sentinel),
            "order-total" | "order_total" => Some(Self::OrderTotal),
            "zero" => Some(Self::Zero),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub mongodb_uri: String,
    pub mongodb_db: String,
    pub host: String,
    pub port: u16,

    pub report_offset: FixedOffset,
    pub payment_fetch_concurrency: usize,
    pub payment_failure_policy: PaymentFailurePolicy,
    pub no_intent_card_policy: NoIntentCardPolicy,
    pub fetch_retries: u32,
    pub fetch_retry_delay_ms: u64,
    pub top_products_limit: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            mongodb_uri: "mongodb://localhost:27017".to_string(),
            mongodb_db: "kitos".to_string(),
            host: "127.0.0.1".to_string(),
            port: 3000,
            report_offset: utc(),
            payment_fetch_concurrency: 16,
            payment_failure_policy: PaymentFailurePolicy::Skip,
            no_intent_card_policy: NoIntentCardPolicy::Sentinel,
            fetch_retries: 2,
            fetch_retry_delay_ms: 200,
            top_products_limit: 5,
        }
    }
}

fn utc() -> FixedOffset {
    Utc.fix()
}

fn parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.trim().parse::<T>().ok())
}

pub fn load() -> Settings {
    // Loads .env if present (no crash if missing)
    dotenvy::dotenv().ok();

    let defaults = Settings::default();

    let mongodb_uri = env::var("MONGODB_URI").unwrap_or(defaults.mongodb_uri);
    let mongodb_db = env::var("MONGODB_DB").unwrap_or(defaults.mongodb_db);
    let host = env::var("HOST").unwrap_or(defaults.host);
    let port = parsed::<u16>("PORT").unwrap_or(defaults.port);

    let report_offset = parsed::<i32>("KITOS_REPORT_UTC_OFFSET_MINUTES")
        .and_then(|m| m.checked_mul(60))
        .and_then(FixedOffset::east_opt)
        .unwrap_or(defaults.report_offset);

    let payment_fetch_concurrency = parsed::<usize>("KITOS_PAYMENT_FETCH_CONCURRENCY")
        .filter(|n| *n > 0)
        .unwrap_or(defaults.payment_fetch_concurrency);

    let payment_failure_policy = env::var("KITOS_PAYMENT_FAILURE_POLICY")
        .ok()
        .and_then(|s| PaymentFailurePolicy::parse(&s))
        .unwrap_or(defaults.payment_failure_policy);

    let no_intent_card_policy = env::var("KITOS_NO_INTENT_CARD")
        .ok()
        .and_then(|s| NoIntentCardPolicy::parse(&s))
        .unwrap_or(defaults.no_intent_card_policy);

    let fetch_retries = parsed::<u32>("KITOS_FETCH_RETRIES").unwrap_or(defaults.fetch_retries);
    let fetch_retry_delay_ms =
        parsed::<u64>("KITOS_FETCH_RETRY_DELAY_MS").unwrap_or(defaults.fetch_retry_delay_ms);
    let top_products_limit =
        parsed::<usize>("KITOS_TOP_PRODUCTS").unwrap_or(defaults.top_products_limit);

    Settings {
        mongodb_uri,
        mongodb_db,
        host,
        port,
        report_offset,
        payment_fetch_concurrency,
        payment_failure_policy,
        no_intent_card_policy,
        fetch_retries,
        fetch_retry_delay_ms,
        top_products_limit,
    }
}
