use std::{collections::HashMap, sync::Arc};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CartError {
    #[error("Missing restaurant id.")]
    MissingRestaurant,

    #[error("Missing product id.")]
    MissingProduct,

    #[error("Enter a valid quantity.")]
    InvalidQuantity,

    #[error("Enter a valid price.")]
    InvalidPrice,

    #[error("Cart already holds items from restaurant {current}; cannot add items from {requested}.")]
    RestaurantMismatch { current: String, requested: String },

    #[error("Product {0} is not in the cart.")]
    UnknownProduct(String),

    #[error("Cart is empty.")]
    Empty,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: String,
    pub name: String,
    pub unit_price: f64,
    pub quantity: u32,
}

impl CartLine {
    pub fn line_total(&self) -> f64 {
        self.unit_price * f64::from(self.quantity)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCartItem {
    pub restaurant_id: String,
    pub product_id: String,
    #[serde(default)]
    pub name: String,
    pub unit_price: f64,
    #[serde(default = "one")]
    pub quantity: u32,
}

fn one() -> u32 {
    1
}

/// Marketplace cart. Holds items from a single restaurant at a time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub restaurant_id: Option<String>,
    pub lines: Vec<CartLine>,
}

impl Cart {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity)).sum()
    }

    pub fn subtotal(&self) -> f64 {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Adds `item`, merging with an existing line for the same product.
    pub fn add_item(&mut self, item: NewCartItem) -> Result<(), CartError> {
        let product_id = item.product_id.trim();
        if product_id.is_empty() {
            return Err(CartError::MissingProduct);
        }
        if item.quantity == 0 {
            return Err(CartError::InvalidQuantity);
        }
        if !item.unit_price.is_finite() || item.unit_price < 0.0 {
            return Err(CartError::InvalidPrice);
        }

        let restaurant_id = item.restaurant_id.trim();
        if restaurant_id.is_empty() {
            return Err(CartError::MissingRestaurant);
        }
        match self.restaurant_id.as_deref() {
            Some(current) if !self.lines.is_empty() && current != restaurant_id => {
                return Err(CartError::RestaurantMismatch {
                    current: current.to_string(),
                    requested: restaurant_id.to_string(),
                });
            }
            _ => self.restaurant_id = Some(restaurant_id.to_string()),
        }

        match self.lines.iter_mut().find(|l| l.product_id == product_id) {
            Some(line) => {
                line.quantity = line.quantity.saturating_add(item.quantity);
                line.unit_price = item.unit_price;
            }
            None => self.lines.push(CartLine {
                product_id: product_id.to_string(),
                name: item.name,
                unit_price: item.unit_price,
                quantity: item.quantity,
            }),
        }
        Ok(())
    }

    /// Sets a line's quantity; zero removes the line.
    pub fn set_quantity(&mut self, product_id: &str, quantity: u32) -> Result<(), CartError> {
        if quantity == 0 {
            return self.remove_item(product_id);
        }

        let line = self
            .lines
            .iter_mut()
            .find(|l| l.product_id == product_id)
            .ok_or_else(|| CartError::UnknownProduct(product_id.to_string()))?;
        line.quantity = quantity;
        Ok(())
    }

    pub fn remove_item(&mut self, product_id: &str) -> Result<(), CartError> {
        let before = self.lines.len();
        self.lines.retain(|l| l.product_id != product_id);
        if self.lines.len() == before {
            return Err(CartError::UnknownProduct(product_id.to_string()));
        }
        if self.lines.is_empty() {
            self.restaurant_id = None;
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        self.lines.clear();
        self.restaurant_id = None;
    }
}

/// Shared handle to every open cart, keyed by cart id.
///
/// Cloning shares the underlying map, so one instance is created per app
/// and passed around explicitly.
#[derive(Clone, Default)]
pub struct CartStore {
    carts: Arc<RwLock<HashMap<String, Cart>>>,
}

impl CartStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cart, or an empty one if it doesn't exist yet.
    pub async fn get(&self, cart_id: &str) -> Cart {
        self.carts.read().await.get(cart_id).cloned().unwrap_or_default()
    }

    /// Applies `f` to a copy of the cart and stores it only if `f` succeeds.
    pub async fn update<F>(&self, cart_id: &str, f: F) -> Result<Cart, CartError>
    where
        F: FnOnce(&mut Cart) -> Result<(), CartError>,
    {
        let mut carts = self.carts.write().await;
        let mut cart = carts.get(cart_id).cloned().unwrap_or_default();
        f(&mut cart)?;

        if cart.is_empty() {
            carts.remove(cart_id);
        } else {
            carts.insert(cart_id.to_string(), cart.clone());
        }
        Ok(cart)
    }

    pub async fn clear(&self, cart_id: &str) {
        self.carts.write().await.remove(cart_id);
    }

    /// Drops the cart if it still equals `snapshot`. Returns whether it did.
    pub async fn clear_if_unchanged(&self, cart_id: &str, snapshot: &Cart) -> bool {
        let mut carts = self.carts.write().await;
        if carts.get(cart_id) == Some(snapshot) {
            carts.remove(cart_id);
            return true;
        }
        false
    }
}
