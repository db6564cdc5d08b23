use serde::{Deserialize, Serialize};

use super::{ids::string_or_object_id, line_item::RawLineItem};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickupOrder {
    #[serde(rename = "_id", deserialize_with = "string_or_object_id")]
    pub id: String,

    #[serde(default, deserialize_with = "string_or_object_id")]
    pub restaurant_id: String,

    // "completed" | "preparing" | "ready" | "scheduled" | "cancelled"
    #[serde(default)]
    pub status: String,

    // unix seconds
    #[serde(default)]
    pub created_at: Option<i64>,

    #[serde(default)]
    pub total: Option<f64>,

    #[serde(default)]
    pub items: Vec<RawLineItem>,

    #[serde(default)]
    pub payment_intent_id: Option<String>,

    #[serde(default)]
    pub customer_name: Option<String>,

    // unix seconds, only for scheduled pickups
    #[serde(default)]
    pub scheduled_for: Option<i64>,
}
