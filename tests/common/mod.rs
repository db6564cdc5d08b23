#![allow(dead_code)]

use std::{
    collections::HashSet,
    sync::{
        atomic::{AtomicU32, AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use futures_util::future::BoxFuture;
use http_body_util::BodyExt;
use kitos::{
    config::Settings,
    error::{AppError, AppResult},
    models::{
        LineItem, OrderStatus, Payment, PaymentMethods, PickupOrder, RawLineItem, Restaurant, Session,
        SourceType, UnifiedOrder,
    },
    services::{cart_service::CartStore, store::OrderStore},
    templates, AppState,
};

/// In-memory stand-in for the document database.
#[derive(Default)]
pub struct MemoryStore {
    pub sessions: Vec<Session>,
    pub payments: Vec<Payment>,
    pub pickup_orders: Mutex<Vec<PickupOrder>>,
    pub restaurants: Vec<Restaurant>,

    // list_session_payments fails for these ids
    pub broken_payment_sessions: HashSet<String>,
    // list_sessions fails this many times before answering
    pub session_failures: AtomicU32,
    // every call fails
    pub down: bool,

    pub payment_calls: AtomicUsize,
    pub session_calls: AtomicUsize,
}

impl MemoryStore {
    fn check_up(&self) -> AppResult<()> {
        if self.down {
            return Err(AppError::Database("connection refused".into()));
        }
        Ok(())
    }

    pub fn inserted_orders(&self) -> Vec<PickupOrder> {
        self.pickup_orders.lock().unwrap().clone()
    }
}

impl OrderStore for MemoryStore {
    fn ping(&self) -> BoxFuture<'_, AppResult<()>> {
        Box::pin(async move { self.check_up() })
    }

    fn list_sessions<'a>(
        &'a self,
        restaurant_id: &'a str,
        start: i64,
        end: i64,
    ) -> BoxFuture<'a, AppResult<Vec<Session>>> {
        Box::pin(async move {
            self.check_up()?;
            self.session_calls.fetch_add(1, Ordering::SeqCst);

            let remaining = self.session_failures.load(Ordering::SeqCst);
            if remaining > 0 {
                self.session_failures.store(remaining - 1, Ordering::SeqCst);
                return Err(AppError::Database("timeout".into()));
            }

            Ok(self
                .sessions
                .iter()
                .filter(|s| s.restaurant_id == restaurant_id)
                .filter(|s| s.start_time.is_some_and(|t| t >= start && t <= end))
                .cloned()
                .collect())
        })
    }

    fn list_session_payments<'a>(&'a self, session_id: &'a str) -> BoxFuture<'a, AppResult<Vec<Payment>>> {
        Box::pin(async move {
            self.check_up()?;
            self.payment_calls.fetch_add(1, Ordering::SeqCst);

            if self.broken_payment_sessions.contains(session_id) {
                return Err(AppError::Database(format!("payments for {session_id} unavailable")));
            }

            Ok(self
                .payments
                .iter()
                .filter(|p| p.session_id == session_id)
                .cloned()
                .collect())
        })
    }

    fn list_pickup_orders<'a>(
        &'a self,
        restaurant_id: &'a str,
        start: i64,
        end: i64,
    ) -> BoxFuture<'a, AppResult<Vec<PickupOrder>>> {
        Box::pin(async move {
            self.check_up()?;
            Ok(self
                .pickup_orders
                .lock()
                .unwrap()
                .iter()
                .filter(|o| o.restaurant_id == restaurant_id)
                .filter(|o| o.created_at.is_some_and(|t| t >= start && t <= end))
                .cloned()
                .collect())
        })
    }

    fn find_restaurant<'a>(&'a self, restaurant_id: &'a str) -> BoxFuture<'a, AppResult<Option<Restaurant>>> {
        Box::pin(async move {
            self.check_up()?;
            Ok(self.restaurants.iter().find(|r| r.id == restaurant_id).cloned())
        })
    }

    fn insert_pickup_order<'a>(&'a self, order: &'a PickupOrder) -> BoxFuture<'a, AppResult<()>> {
        Box::pin(async move {
            self.check_up()?;
            self.pickup_orders.lock().unwrap().push(order.clone());
            Ok(())
        })
    }
}

pub fn test_settings() -> Settings {
    Settings {
        fetch_retry_delay_ms: 1,
        ..Settings::default()
    }
}

pub fn test_state(store: MemoryStore) -> (AppState, Arc<MemoryStore>) {
    let store = Arc::new(store);
    let state = AppState {
        hbs: templates::build_handlebars(),
        store: store.clone(),
        settings: test_settings(),
        carts: CartStore::new(),
    };
    (state, store)
}

pub async fn response_body_string(res: axum::response::Response) -> String {
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8_lossy(&bytes).to_string()
}

/// Unix seconds for a UTC wall-clock time.
pub fn ts(y: i32, m: u32, d: u32, h: u32, min: u32) -> i64 {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap().timestamp()
}

pub fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
}

pub fn at(rfc3339: &str) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(rfc3339).unwrap()
}

pub fn item(product_id: &str, name: &str, quantity: f64, unit_price: f64) -> RawLineItem {
    RawLineItem {
        product_id: Some(product_id.to_string()),
        name: Some(name.to_string()),
        quantity: Some(quantity),
        unit_price: Some(unit_price),
    }
}

pub fn session(id: &str, restaurant_id: &str, status: &str, start_time: i64, total: f64) -> Session {
    Session {
        id: id.to_string(),
        restaurant_id: restaurant_id.to_string(),
        status: status.to_string(),
        start_time: Some(start_time),
        total: Some(total),
        items: vec![],
    }
}

pub fn payment(id: &str, session_id: &str, method: &str, amount: f64, tip: f64) -> Payment {
    Payment {
        id: id.to_string(),
        session_id: session_id.to_string(),
        tip: Some(tip),
        method: method.to_string(),
        amount: Some(amount),
    }
}

pub fn pickup(id: &str, restaurant_id: &str, status: &str, created_at: i64, total: f64, intent: Option<&str>) -> PickupOrder {
    PickupOrder {
        id: id.to_string(),
        restaurant_id: restaurant_id.to_string(),
        status: status.to_string(),
        created_at: Some(created_at),
        total: Some(total),
        items: vec![],
        payment_intent_id: intent.map(str::to_string),
        customer_name: None,
        scheduled_for: None,
    }
}

pub fn restaurant(id: &str) -> Restaurant {
    Restaurant {
        id: id.to_string(),
        name: "Kitos Test Kitchen".to_string(),
        settings: Default::default(),
    }
}

/// A unified order built directly, for tests that skip normalization.
pub fn order(
    id: &str,
    source_type: SourceType,
    status: OrderStatus,
    timestamp: DateTime<Utc>,
    total: f64,
    tips: f64,
) -> UnifiedOrder {
    UnifiedOrder {
        id: id.to_string(),
        source_type,
        status,
        timestamp,
        total,
        tips,
        items: vec![],
        payment_methods: PaymentMethods::default(),
    }
}

pub fn line(product_id: &str, name: &str, quantity: u32, unit_price: f64) -> LineItem {
    LineItem {
        product_id: product_id.to_string(),
        name: name.to_string(),
        quantity,
        unit_price,
    }
}
