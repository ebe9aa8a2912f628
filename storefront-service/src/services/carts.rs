//! Per-customer shopping carts.
//!
//! Carts are process-local working state: adding an existing product merges
//! quantities (unlike the edit session, which allows duplicate lines), and
//! setting a quantity to zero or below removes the entry.

use rust_decimal::Decimal;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{CartItem, Product};

#[derive(Default)]
pub struct CartService {
    carts: RwLock<HashMap<Uuid, Vec<CartItem>>>,
}

impl CartService {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn items(&self, customer_id: Uuid) -> Vec<CartItem> {
        self.carts
            .read()
            .await
            .get(&customer_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Add a product, merging into an existing entry for the same product.
    /// Quantities below 1 are ignored.
    pub async fn add_item(
        &self,
        customer_id: Uuid,
        product: Product,
        quantity: i32,
    ) -> Vec<CartItem> {
        if quantity < 1 {
            return self.items(customer_id).await;
        }

        let mut carts = self.carts.write().await;
        let cart = carts.entry(customer_id).or_default();
        match cart.iter_mut().find(|item| item.product.id == product.id) {
            Some(item) => item.quantity += quantity,
            None => cart.push(CartItem { product, quantity }),
        }
        cart.clone()
    }

    /// Set a product's quantity; zero or below removes the entry.
    pub async fn update_quantity(
        &self,
        customer_id: Uuid,
        product_id: Uuid,
        quantity: i32,
    ) -> Vec<CartItem> {
        let mut carts = self.carts.write().await;
        let cart = carts.entry(customer_id).or_default();
        if quantity <= 0 {
            cart.retain(|item| item.product.id != product_id);
        } else if let Some(item) = cart.iter_mut().find(|i| i.product.id == product_id) {
            item.quantity = quantity;
        }
        cart.clone()
    }

    pub async fn remove_item(&self, customer_id: Uuid, product_id: Uuid) -> Vec<CartItem> {
        let mut carts = self.carts.write().await;
        let cart = carts.entry(customer_id).or_default();
        cart.retain(|item| item.product.id != product_id);
        cart.clone()
    }

    pub async fn clear(&self, customer_id: Uuid) {
        self.carts.write().await.remove(&customer_id);
    }

    pub fn total_price(items: &[CartItem]) -> Decimal {
        items
            .iter()
            .map(|item| item.product.price * Decimal::from(item.quantity))
            .sum()
    }

    pub fn total_items(items: &[CartItem]) -> i32 {
        items.iter().map(|item| item.quantity).sum()
    }
}
