pub mod store;
pub mod mongo_store;

pub mod normalizer;
pub mod metrics_service;
pub mod analytics_service;
pub mod cart_service;
pub mod checkout_service;
