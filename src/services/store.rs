use std::sync::Arc;

use futures_util::future::BoxFuture;

use crate::{
    error::AppResult,
    models::{Payment, PickupOrder, Restaurant, Session},
};

/// Everything the backend reads from or writes to the document database.
///
/// Time bounds are unix seconds, inclusive on both ends.
pub trait OrderStore: Send + Sync {
    fn ping(&self) -> BoxFuture<'_, AppResult<()>>;

    fn list_sessions<'a>(
        &'a self,
        restaurant_id: &'a str,
        start: i64,
        end: i64,
    ) -> BoxFuture<'a, AppResult<Vec<Session>>>;

    fn list_session_payments<'a>(
        &'a self,
        session_id: &'a str,
    ) -> BoxFuture<'a, AppResult<Vec<Payment>>>;

    fn list_pickup_orders<'a>(
        &'a self,
        restaurant_id: &'a str,
        start: i64,
        end: i64,
    ) -> BoxFuture<'a, AppResult<Vec<PickupOrder>>>;

    fn find_restaurant<'a>(
        &'a self,
        restaurant_id: &'a str,
    ) -> BoxFuture<'a, AppResult<Option<Restaurant>>>;

    fn insert_pickup_order<'a>(&'a self, order: &'a PickupOrder) -> BoxFuture<'a, AppResult<()>>;
}

pub type SharedStore = Arc<dyn OrderStore>;
