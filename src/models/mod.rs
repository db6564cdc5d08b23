pub mod ids;
pub mod line_item;
pub mod session;
pub mod pickup_order;
pub mod restaurant;
pub mod unified_order;
pub mod metrics;

pub use line_item::{LineItem, RawLineItem};
pub use session::{Payment, Session};
pub use pickup_order::PickupOrder;
pub use restaurant::{MarketplaceSettings, Restaurant, RestaurantSettings};
pub use unified_order::{OrderStatus, PaymentMethods, SourceType, UnifiedOrder};
pub use metrics::{
    AnalyticsReport, Charts, DashboardMetrics, Kpis, PaymentSlice, SeriesPoint, TopProduct,
};
