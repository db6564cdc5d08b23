use serde::{Deserialize, Serialize};

use super::ids::string_or_object_id;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Restaurant {
    #[serde(rename = "_id", deserialize_with = "string_or_object_id")]
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub settings: RestaurantSettings,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RestaurantSettings {
    #[serde(default, alias = "marketplaceSettings")]
    pub marketplace: MarketplaceSettings,
}

/// Marketplace (pickup) settings a restaurant can override.
///
/// Missing fields take the defaults below; unknown fields are ignored.
///
/// | field               | default |
/// |---------------------|---------|
/// | `pickup_enabled`    | `true`  |
/// | `accepts_cash`      | `true`  |
/// | `min_order_amount`  | `0.0`   |
/// | `service_fee_pct`   | `0.0`   |
/// | `prep_time_minutes` | `15`    |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MarketplaceSettings {
    #[serde(alias = "pickup_enabled")]
    pub pickup_enabled: bool,
    #[serde(alias = "accepts_cash")]
    pub accepts_cash: bool,
    #[serde(alias = "min_order_amount")]
    pub min_order_amount: f64,
    #[serde(alias = "service_fee_pct")]
    pub service_fee_pct: f64,
    #[serde(alias = "prep_time_minutes")]
    pub prep_time_minutes: u32,
}

impl Default for MarketplaceSettings {
    fn default() -> Self {
        MarketplaceSettings {
            pickup_enabled: true,
            accepts_cash: true,
            min_order_amount: 0.0,
            service_fee_pct: 0.0,
            prep_time_minutes: 15,
        }
    }
}

impl MarketplaceSettings {
    pub fn validate(&self) -> Result<(), String> {
        if !self.min_order_amount.is_finite() || self.min_order_amount < 0.0 {
            return Err("minOrderAmount must be a non-negative number".to_string());
        }
        if !self.service_fee_pct.is_finite() || !(0.0..=100.0).contains(&self.service_fee_pct) {
            return Err("serviceFeePct must be between 0 and 100".to_string());
        }
        if self.prep_time_minutes == 0 {
            return Err("prepTimeMinutes must be greater than 0".to_string());
        }
        Ok(())
    }
}
