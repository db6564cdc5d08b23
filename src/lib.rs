//! Library entrypoint for the Kitos backend.
//!
//! This file exists mainly to make tests easy (integration tests under
//! `tests/` can import the app state, routers, controllers, services).

pub mod config;
pub mod error;
pub mod models;

pub mod services;
pub mod table;

#[path = "views/render.rs"]
pub mod render;
pub mod templates;

pub mod controllers;
pub mod routes;

#[derive(Clone)]
pub struct AppState {
    pub hbs: templates::Hbs,
    pub store: services::store::SharedStore,
    pub settings: config::Settings,
    pub carts: services::cart_service::CartStore,
}
