use serde::{Deserialize, Serialize};

use super::unified_order::UnifiedOrder;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Kpis {
    pub total_sales: f64,
    pub avg_ticket: f64,
    pub total_tips: f64,
    pub active_tables: usize,
    pub active_pickup: usize,
    pub closed_orders: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub name: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentSlice {
    pub name: String,
    pub value: f64,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopProduct {
    pub product_id: String,
    pub name: String,
    pub quantity: u64,
    pub revenue: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Charts {
    pub sales_history: Vec<SeriesPoint>,
    pub peak_hours: Vec<SeriesPoint>,
    pub payments: Vec<PaymentSlice>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardMetrics {
    pub kpis: Kpis,
    pub charts: Charts,
}

/// What the dashboard receives for one restaurant and window.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    pub orders: Vec<UnifiedOrder>,
    pub metrics: DashboardMetrics,
    pub top_products: Vec<TopProduct>,
    // sessions whose payments could not be fetched; their tips and payments read as zero
    pub incomplete_sessions: Vec<String>,
}
