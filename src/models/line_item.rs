use serde::{Deserialize, Serialize};

/// Line item as stored on sessions and pickup orders. Every field is optional
/// in storage.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLineItem {
    #[serde(default, alias = "product_id", alias = "id")]
    pub product_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, alias = "qty")]
    pub quantity: Option<f64>,
    #[serde(default, alias = "unit_price", alias = "price")]
    pub unit_price: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub product_id: String,
    pub name: String,
    pub quantity: u32,
    pub unit_price: f64,
}

impl From<&RawLineItem> for LineItem {
    fn from(raw: &RawLineItem) -> Self {
        let quantity = raw.quantity.unwrap_or(0.0);
        let quantity = if quantity.is_finite() && quantity > 0.0 {
            quantity.round() as u32
        } else {
            0
        };

        LineItem {
            product_id: raw.product_id.clone().unwrap_or_default(),
            name: raw.name.clone().unwrap_or_default(),
            quantity,
            unit_price: non_negative(raw.unit_price),
        }
    }
}

/// Missing, NaN and negative amounts all read as zero.
pub fn non_negative(v: Option<f64>) -> f64 {
    match v {
        Some(x) if x.is_finite() && x > 0.0 => x,
        _ => 0.0,
    }
}
