use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, FixedOffset, Timelike};

use crate::models::{
    Charts, DashboardMetrics, Kpis, OrderStatus, PaymentMethods, PaymentSlice, SeriesPoint,
    SourceType, TopProduct, UnifiedOrder,
};

pub const HOURS_PER_DAY: usize = 24;

const MS_PER_DAY: f64 = 86_400_000.0;

const CASH_COLOR: &str = "#10b981";
const CARD_COLOR: &str = "#3b82f6";
const APP_COLOR: &str = "#6366f1";

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Whole days covered by the window, rounded up, never below 1.
pub fn day_diff(start: DateTime<FixedOffset>, end: DateTime<FixedOffset>) -> i64 {
    let ms = (end - start).num_milliseconds() as f64;
    let days = (ms / MS_PER_DAY).ceil() as i64;
    days.max(1)
}

/// KPIs and chart series for the dashboard.
///
/// Hour and day buckets use the offset of `start`. Windows of two days or less
/// chart sales per hour of day, longer ones per calendar day. Peak hours always
/// carry all 24 hours, averaged over the days in the window.
pub fn calculate_metrics(
    orders: &[UnifiedOrder],
    start: DateTime<FixedOffset>,
    end: DateTime<FixedOffset>,
) -> DashboardMetrics {
    let (closed, active): (Vec<&UnifiedOrder>, Vec<&UnifiedOrder>) =
        orders.iter().partition(|o| o.status == OrderStatus::Closed);

    let total_sales: f64 = closed.iter().map(|o| o.total).sum();
    let avg_ticket = if closed.is_empty() {
        0.0
    } else {
        total_sales / closed.len() as f64
    };

    // tips count whether or not the order is closed
    let total_tips: f64 = orders.iter().map(|o| o.tips).sum();

    let kpis = Kpis {
        total_sales,
        avg_ticket,
        total_tips,
        active_tables: active.iter().filter(|o| o.source_type == SourceType::DineIn).count(),
        active_pickup: active.iter().filter(|o| o.source_type == SourceType::Takeout).count(),
        closed_orders: closed.len(),
    };

    let mut paid = PaymentMethods::default();
    for o in orders {
        paid += o.payment_methods;
    }

    let payments = vec![
        PaymentSlice {
            name: "Cash".to_string(),
            value: paid.cash,
            color: CASH_COLOR.to_string(),
        },
        PaymentSlice {
            name: "Card".to_string(),
            value: paid.card,
            color: CARD_COLOR.to_string(),
        },
        PaymentSlice {
            name: "App".to_string(),
            value: paid.app,
            color: APP_COLOR.to_string(),
        },
    ];

    let days = day_diff(start, end);
    let hourly = days <= 2;
    let tz = start.timezone();

    let mut history: BTreeMap<String, f64> = BTreeMap::new();
    let mut by_hour = [0.0_f64; HOURS_PER_DAY];

    for o in &closed {
        let local = o.timestamp.with_timezone(&tz);

        let key = if hourly {
            format!("{:02}:00", local.hour())
        } else {
            local.format("%d/%m").to_string()
        };
        *history.entry(key).or_insert(0.0) += o.total;

        by_hour[local.hour() as usize] += o.total;
    }

    let sales_history = history
        .into_iter()
        .map(|(key, value)| {
            let name = if hourly {
                key.split(':').next().unwrap_or_default().to_string()
            } else {
                key
            };
            SeriesPoint { name, value }
        })
        .collect();

    let peak_hours = by_hour
        .iter()
        .enumerate()
        .map(|(hour, total)| SeriesPoint {
            name: format!("{hour:02}"),
            value: round2(total / days as f64),
        })
        .collect();

    DashboardMetrics {
        kpis,
        charts: Charts {
            sales_history,
            peak_hours,
            payments,
        },
    }
}

/// Best sellers among closed orders, by revenue.
pub fn top_products(orders: &[UnifiedOrder], limit: usize) -> Vec<TopProduct> {
    let mut by_product: HashMap<String, TopProduct> = HashMap::new();

    for item in orders.iter().filter(|o| o.is_closed()).flat_map(|o| &o.items) {
        let key = if item.product_id.is_empty() {
            item.name.clone()
        } else {
            item.product_id.clone()
        };
        if key.is_empty() {
            continue;
        }

        let entry = by_product.entry(key.clone()).or_insert_with(|| TopProduct {
            product_id: key,
            name: item.name.clone(),
            quantity: 0,
            revenue: 0.0,
        });
        entry.quantity += u64::from(item.quantity);
        entry.revenue += f64::from(item.quantity) * item.unit_price;
    }

    let mut out: Vec<TopProduct> = by_product.into_values().collect();
    out.sort_by(|a, b| {
        b.revenue
            .total_cmp(&a.revenue)
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.product_id.cmp(&b.product_id))
    });
    out.truncate(limit);

    for p in &mut out {
        p.revenue = round2(p.revenue);
    }
    out
}
