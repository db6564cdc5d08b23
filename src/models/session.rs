use serde::{Deserialize, Serialize};

use super::{ids::string_or_object_id, line_item::RawLineItem};

/// Dine-in table tab.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(rename = "_id", deserialize_with = "string_or_object_id")]
    pub id: String,

    #[serde(default, deserialize_with = "string_or_object_id")]
    pub restaurant_id: String,

    // "closed" | anything else means still open
    #[serde(default)]
    pub status: String,

    // unix seconds
    #[serde(default)]
    pub start_time: Option<i64>,

    #[serde(default)]
    pub total: Option<f64>,

    #[serde(default)]
    pub items: Vec<RawLineItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    #[serde(rename = "_id", deserialize_with = "string_or_object_id")]
    pub id: String,

    #[serde(default, deserialize_with = "string_or_object_id")]
    pub session_id: String,

    #[serde(default)]
    pub tip: Option<f64>,

    // "cash" | "stripe" | card terminals and anything else
    #[serde(default)]
    pub method: String,

    #[serde(default)]
    pub amount: Option<f64>,
}
