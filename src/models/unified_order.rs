use std::ops::AddAssign;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::line_item::LineItem;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceType {
    #[serde(rename = "dine-in")]
    DineIn,
    #[serde(rename = "takeout")]
    Takeout,
}

impl SourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::DineIn => "dine-in",
            SourceType::Takeout => "takeout",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Active,
    Closed,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Active => "active",
            OrderStatus::Closed => "closed",
        }
    }
}

/// Amount settled per payment channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PaymentMethods {
    pub cash: f64,
    pub card: f64,
    pub app: f64,
}

impl PaymentMethods {
    pub fn sum(&self) -> f64 {
        self.cash + self.card + self.app
    }
}

impl AddAssign for PaymentMethods {
    fn add_assign(&mut self, rhs: Self) {
        self.cash += rhs.cash;
        self.card += rhs.card;
        self.app += rhs.app;
    }
}

/// One order in the reporting model, whichever collection it came from.
///
/// Built fresh for every report and never written back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnifiedOrder {
    pub id: String,
    pub source_type: SourceType,
    pub status: OrderStatus,
    pub timestamp: DateTime<Utc>,
    pub total: f64,
    pub tips: f64,
    pub items: Vec<LineItem>,
    pub payment_methods: PaymentMethods,
}

impl UnifiedOrder {
    pub fn is_closed(&self) -> bool {
        self.status == OrderStatus::Closed
    }
}
