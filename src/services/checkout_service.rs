use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    error::{AppError, AppResult},
    models::{PickupOrder, RawLineItem},
};

use super::{
    cart_service::{CartError, CartStore},
    store::OrderStore,
};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    #[serde(default)]
    pub customer_name: Option<String>,

    // pay in cash at the counter instead of in the app
    #[serde(default)]
    pub pay_at_pickup: bool,

    // unix seconds
    #[serde(default)]
    pub scheduled_for: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutReceipt {
    pub order_id: String,
    pub restaurant_id: String,
    pub status: String,
    pub subtotal: f64,
    pub service_fee: f64,
    pub total: f64,
    pub payment_intent_id: Option<String>,
    // unix seconds
    pub ready_at: i64,
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Places the cart as a pickup order.
///
/// Payment is mocked: app payments get a generated intent id, pickup payments
/// get none. The cart is cleared only once the order is stored, and only if it
/// wasn't modified meanwhile.
pub async fn checkout(
    store: &dyn OrderStore,
    carts: &CartStore,
    cart_id: &str,
    req: &CheckoutRequest,
    now: i64,
) -> AppResult<CheckoutReceipt> {
    let cart = carts.get(cart_id).await;
    let Some(restaurant_id) = cart.restaurant_id.clone().filter(|_| !cart.is_empty()) else {
        return Err(CartError::Empty.into());
    };

    let restaurant = store
        .find_restaurant(&restaurant_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("restaurant {restaurant_id}")))?;

    let settings = &restaurant.settings.marketplace;
    settings
        .validate()
        .map_err(|e| AppError::Validation(format!("Restaurant settings are invalid: {e}")))?;

    if !settings.pickup_enabled {
        return Err(AppError::Validation("This restaurant is not taking pickup orders.".into()));
    }
    if req.pay_at_pickup && !settings.accepts_cash {
        return Err(AppError::Validation(
            "This restaurant does not accept payment at pickup.".into(),
        ));
    }

    let subtotal = round2(cart.subtotal());
    if subtotal < settings.min_order_amount {
        return Err(AppError::Validation(format!(
            "Minimum order is {:.2}.",
            settings.min_order_amount
        )));
    }

    if let Some(at) = req.scheduled_for {
        if at < now {
            return Err(AppError::Validation("Pickup time is in the past.".into()));
        }
    }

    let service_fee = round2(subtotal * settings.service_fee_pct / 100.0);
    let total = round2(subtotal + service_fee);

    let status = if req.scheduled_for.is_some() { "scheduled" } else { "preparing" };
    let payment_intent_id = if req.pay_at_pickup {
        None
    } else {
        Some(format!("pi_mock_{}", ObjectId::new().to_hex()))
    };
    let ready_at = req
        .scheduled_for
        .unwrap_or(now + i64::from(settings.prep_time_minutes) * 60);

    let order = PickupOrder {
        id: ObjectId::new().to_hex(),
        restaurant_id: restaurant_id.clone(),
        status: status.to_string(),
        created_at: Some(now),
        total: Some(total),
        items: cart
            .lines
            .iter()
            .map(|l| RawLineItem {
                product_id: Some(l.product_id.clone()),
                name: Some(l.name.clone()),
                quantity: Some(f64::from(l.quantity)),
                unit_price: Some(l.unit_price),
            })
            .collect(),
        payment_intent_id: payment_intent_id.clone(),
        customer_name: req
            .customer_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string),
        scheduled_for: req.scheduled_for,
    };

    store.insert_pickup_order(&order).await?;
    carts.clear_if_unchanged(cart_id, &cart).await;

    info!(order_id = %order.id, restaurant_id = %restaurant_id, total, "pickup order placed");

    Ok(CheckoutReceipt {
        order_id: order.id,
        restaurant_id,
        status: order.status,
        subtotal,
        service_fee,
        total,
        payment_intent_id,
        ready_at,
    })
}
