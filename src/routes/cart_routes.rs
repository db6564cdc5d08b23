use axum::{Router, routing::{get, post, put}};

use crate::{AppState, controllers::cart_controller};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route(
            "/api/carts/:cart_id",
            get(cart_controller::get_cart).delete(cart_controller::delete_cart),
        )
        .route("/api/carts/:cart_id/items", post(cart_controller::post_cart_item))
        .route(
            "/api/carts/:cart_id/items/:product_id",
            put(cart_controller::put_cart_item).delete(cart_controller::delete_cart_item),
        )
        .route("/api/carts/:cart_id/checkout", post(cart_controller::post_checkout))
}
