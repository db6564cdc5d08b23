pub mod home_controller;
pub mod analytics_controller;
pub mod cart_controller;
