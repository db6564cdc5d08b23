//! Raw dine-in sessions and pickup orders into [`UnifiedOrder`].

use chrono::{DateTime, Utc};

use crate::{
    config::NoIntentCardPolicy,
    models::{
        line_item::non_negative, LineItem, OrderStatus, Payment, PaymentMethods, PickupOrder,
        Session, SourceType, UnifiedOrder,
    },
};

/// Missing or out-of-range timestamps read as the unix epoch.
fn timestamp(secs: Option<i64>) -> DateTime<Utc> {
    secs.and_then(|s| DateTime::from_timestamp(s, 0))
        .unwrap_or_default()
}

pub fn normalize_session(session: &Session, payments: &[Payment]) -> UnifiedOrder {
    let status = if session.status == "closed" {
        OrderStatus::Closed
    } else {
        OrderStatus::Active
    };

    let mut tips = 0.0;
    let mut methods = PaymentMethods::default();

    for p in payments {
        tips += non_negative(p.tip);

        let amount = non_negative(p.amount);
        match p.method.as_str() {
            "cash" => methods.cash += amount,
            "stripe" => methods.app += amount,
            _ => methods.card += amount,
        }
    }

    UnifiedOrder {
        id: session.id.clone(),
        source_type: SourceType::DineIn,
        status,
        timestamp: timestamp(session.start_time),
        total: non_negative(session.total),
        tips,
        items: session.items.iter().map(LineItem::from).collect(),
        payment_methods: methods,
    }
}

pub fn normalize_pickup_order(
    order: &PickupOrder,
    card_policy: NoIntentCardPolicy,
) -> UnifiedOrder {
    let mut total = non_negative(order.total);

    // unknown statuses count as finished
    let status = match order.status.as_str() {
        "completed" => OrderStatus::Closed,
        "preparing" | "ready" | "scheduled" => OrderStatus::Active,
        "cancelled" => {
            total = 0.0;
            OrderStatus::Closed
        }
        _ => OrderStatus::Closed,
    };

    let has_intent = order
        .payment_intent_id
        .as_deref()
        .is_some_and(|id| !id.trim().is_empty());

    let payment_methods = if has_intent {
        PaymentMethods {
            app: total,
            ..PaymentMethods::default()
        }
    } else {
        let card = match card_policy {
            NoIntentCardPolicy::Sentinel => 1.0,
            NoIntentCardPolicy::OrderTotal => total,
            NoIntentCardPolicy::Zero => 0.0,
        };
        PaymentMethods {
            card,
            ..PaymentMethods::default()
        }
    };

    UnifiedOrder {
        id: order.id.clone(),
        source_type: SourceType::Takeout,
        status,
        timestamp: timestamp(order.created_at),
        total,
        tips: 0.0,
        items: order.items.iter().map(LineItem::from).collect(),
        payment_methods,
    }
}
