use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{
    error::AppResult,
    services::{
        cart_service::{Cart, CartLine, NewCartItem},
        checkout_service::{self, CheckoutRequest},
    },
    AppState,
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub cart_id: String,
    pub restaurant_id: Option<String>,
    pub lines: Vec<CartLine>,
    pub item_count: u64,
    pub subtotal: f64,
}

impl CartView {
    fn new(cart_id: &str, cart: Cart) -> Self {
        let item_count = cart.item_count();
        let subtotal = (cart.subtotal() * 100.0).round() / 100.0;
        CartView {
            cart_id: cart_id.to_string(),
            restaurant_id: cart.restaurant_id,
            lines: cart.lines,
            item_count,
            subtotal,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct QuantityForm {
    pub quantity: u32,
}

// GET /api/carts/:cart_id
pub async fn get_cart(
    State(state): State<AppState>,
    Path(cart_id): Path<String>,
) -> Json<CartView> {
    let cart = state.carts.get(&cart_id).await;
    Json(CartView::new(&cart_id, cart))
}

// POST /api/carts/:cart_id/items
pub async fn post_cart_item(
    State(state): State<AppState>,
    Path(cart_id): Path<String>,
    Json(item): Json<NewCartItem>,
) -> AppResult<Json<CartView>> {
    let cart = state.carts.update(&cart_id, |c| c.add_item(item)).await?;
    Ok(Json(CartView::new(&cart_id, cart)))
}

// PUT /api/carts/:cart_id/items/:product_id
pub async fn put_cart_item(
    State(state): State<AppState>,
    Path((cart_id, product_id)): Path<(String, String)>,
    Json(form): Json<QuantityForm>,
) -> AppResult<Json<CartView>> {
    let cart = state
        .carts
        .update(&cart_id, |c| c.set_quantity(&product_id, form.quantity))
        .await?;
    Ok(Json(CartView::new(&cart_id, cart)))
}

// DELETE /api/carts/:cart_id/items/:product_id
pub async fn delete_cart_item(
    State(state): State<AppState>,
    Path((cart_id, product_id)): Path<(String, String)>,
) -> AppResult<Json<CartView>> {
    let cart = state
        .carts
        .update(&cart_id, |c| c.remove_item(&product_id))
        .await?;
    Ok(Json(CartView::new(&cart_id, cart)))
}

// DELETE /api/carts/:cart_id
pub async fn delete_cart(State(state): State<AppState>, Path(cart_id): Path<String>) -> StatusCode {
    state.carts.clear(&cart_id).await;
    StatusCode::NO_CONTENT
}

// POST /api/carts/:cart_id/checkout
pub async fn post_checkout(
    State(state): State<AppState>,
    Path(cart_id): Path<String>,
    Json(req): Json<CheckoutRequest>,
) -> AppResult<Response> {
    let now = Utc::now().timestamp();
    let receipt =
        checkout_service::checkout(state.store.as_ref(), &state.carts, &cart_id, &req, now).await?;
    Ok((StatusCode::CREATED, Json(receipt)).into_response())
}
