use axum::{Router, routing::get};

use crate::{AppState, controllers::analytics_controller};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route(
            "/api/restaurants/:restaurant_id/analytics",
            get(analytics_controller::get_analytics),
        )
        .route("/api/restaurants/:restaurant_id/orders", get(analytics_controller::get_orders))
        .route("/restaurants/:restaurant_id/dashboard", get(analytics_controller::get_dashboard))
}
