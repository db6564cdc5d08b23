use futures_util::{future::BoxFuture, StreamExt};
use mongodb::{
    bson::doc,
    options::{FindOptions, IndexOptions},
    Cursor, Database, IndexModel,
};
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::{
    error::AppResult,
    models::{ids::id_filter, Payment, PickupOrder, Restaurant, Session},
};

use super::store::OrderStore;

const SESSIONS: &str = "sessions";
const PAYMENTS: &str = "payments";
const PICKUP_ORDERS: &str = "pickup_orders";
const RESTAURANTS: &str = "restaurants";

#[derive(Clone)]
pub struct MongoStore {
    db: Database,
}

impl MongoStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        // sessions: dashboard window scan per restaurant
        {
            let col = self.db.collection::<mongodb::bson::Document>(SESSIONS);
            let model = IndexModel::builder()
                .keys(doc! { "restaurantId": 1, "startTime": 1 })
                .build();
            col.create_index(model, None).await?;
        }

        // payments: one lookup per session
        {
            let col = self.db.collection::<mongodb::bson::Document>(PAYMENTS);
            let model = IndexModel::builder().keys(doc! { "sessionId": 1 }).build();
            col.create_index(model, None).await?;
        }

        // pickup orders: same window scan as sessions
        {
            let col = self.db.collection::<mongodb::bson::Document>(PICKUP_ORDERS);
            let model = IndexModel::builder()
                .keys(doc! { "restaurant_id": 1, "created_at": 1 })
                .build();
            col.create_index(model, None).await?;
        }

        // payment intents are unique when present
        {
            let col = self.db.collection::<mongodb::bson::Document>(PICKUP_ORDERS);
            let model = IndexModel::builder()
                .keys(doc! { "payment_intent_id": 1 })
                .options(
                    IndexOptions::builder()
                        .unique(true)
                        .partial_filter_expression(
                            doc! { "payment_intent_id": { "$type": "string" } },
                        )
                        .build(),
                )
                .build();
            if let Err(e) = col.create_index(model, None).await {
                warn!("could not create payment intent index: {}", e);
            }
        }

        Ok(())
    }
}

async fn collect<T>(mut cursor: Cursor<T>) -> AppResult<Vec<T>>
where
    T: DeserializeOwned + Unpin + Send + Sync,
{
    let mut out: Vec<T> = vec![];
    while let Some(res) = cursor.next().await {
        out.push(res?);
    }
    Ok(out)
}

impl OrderStore for MongoStore {
    fn ping(&self) -> BoxFuture<'_, AppResult<()>> {
        Box::pin(async move {
            self.db.run_command(doc! { "ping": 1 }, None).await?;
            Ok(())
        })
    }

    fn list_sessions<'a>(
        &'a self,
        restaurant_id: &'a str,
        start: i64,
        end: i64,
    ) -> BoxFuture<'a, AppResult<Vec<Session>>> {
        Box::pin(async move {
            let sessions = self.db.collection::<Session>(SESSIONS);
            let find_opts = FindOptions::builder().sort(doc! { "startTime": 1 }).build();

            let cursor = sessions
                .find(
                    doc! {
                        "restaurantId": id_filter(restaurant_id),
                        "startTime": { "$gte": start, "$lte": end },
                    },
                    find_opts,
                )
                .await?;

            collect(cursor).await
        })
    }

    fn list_session_payments<'a>(
        &'a self,
        session_id: &'a str,
    ) -> BoxFuture<'a, AppResult<Vec<Payment>>> {
        Box::pin(async move {
            let payments = self.db.collection::<Payment>(PAYMENTS);
            let cursor = payments.find(doc! { "sessionId": id_filter(session_id) }, None).await?;
            collect(cursor).await
        })
    }

    fn list_pickup_orders<'a>(
        &'a self,
        restaurant_id: &'a str,
        start: i64,
        end: i64,
    ) -> BoxFuture<'a, AppResult<Vec<PickupOrder>>> {
        Box::pin(async move {
            let orders = self.db.collection::<PickupOrder>(PICKUP_ORDERS);
            let find_opts = FindOptions::builder().sort(doc! { "created_at": 1 }).build();

            let cursor = orders
                .find(
                    doc! {
                        "restaurant_id": id_filter(restaurant_id),
                        "created_at": { "$gte": start, "$lte": end },
                    },
                    find_opts,
                )
                .await?;

            collect(cursor).await
        })
    }

    fn find_restaurant<'a>(
        &'a self,
        restaurant_id: &'a str,
    ) -> BoxFuture<'a, AppResult<Option<Restaurant>>> {
        Box::pin(async move {
            let restaurants = self.db.collection::<Restaurant>(RESTAURANTS);
            Ok(restaurants.find_one(doc! { "_id": id_filter(restaurant_id) }, None).await?)
        })
    }

    fn insert_pickup_order<'a>(&'a self, order: &'a PickupOrder) -> BoxFuture<'a, AppResult<()>> {
        Box::pin(async move {
            let orders = self.db.collection::<PickupOrder>(PICKUP_ORDERS);
            orders.insert_one(order, None).await?;
            Ok(())
        })
    }
}
