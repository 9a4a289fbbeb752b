//! In-memory implementation of the repository traits
//!
//! Every table lives behind a single `RwLock`, so each multi-entity
//! mutation (checkout commit, delivery advance, cart merge) happens under
//! one write-lock acquisition. That serializes checkout per cart and
//! advance per order without any cross-order locking.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{CartItem, Dispatch, Invoice, Order, Product, Track, User};

use super::{
    CartRepository, CheckoutBundle, OrderRepository, ProductRepository, StoreError, StoreResult,
    UserRepository,
};

#[derive(Default)]
struct Tables {
    users: HashMap<String, User>,
    products: HashMap<String, Product>,
    carts: HashMap<String, Vec<CartItem>>,
    orders: HashMap<Uuid, Order>,
    invoices: HashMap<Uuid, Invoice>,
    dispatches: HashMap<Uuid, Dispatch>,
    tracks: HashMap<Uuid, Track>,
}

/// In-memory store backing all repositories
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the demo menu served at startup.
    pub async fn seed_demo_menu(&self) {
        let menu = [
            ("p1", "Margherita", 8990),
            ("p2", "Pepperoni", 9990),
            ("p3", "Cuatro Quesos", 12990),
        ];
        let mut tables = self.tables.write().await;
        for (id, name, price) in menu {
            tables.products.insert(
                id.to_string(),
                Product {
                    id: id.to_string(),
                    name: name.to_string(),
                    description: None,
                    price,
                    available: true,
                },
            );
        }
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn count(&self) -> StoreResult<usize> {
        Ok(self.tables.read().await.users.len())
    }

    async fn create(&self, user: User) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if tables.users.contains_key(&user.email) {
            return Err(StoreError::DuplicateKey("users.email"));
        }
        tables.users.insert(user.email.clone(), user);
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(self.tables.read().await.users.get(email).cloned())
    }

    async fn update(&self, user: &User) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        tables.users.insert(user.email.clone(), user.clone());
        Ok(())
    }
}

#[async_trait]
impl ProductRepository for MemoryStore {
    async fn list(&self) -> StoreResult<Vec<Product>> {
        let tables = self.tables.read().await;
        let mut products: Vec<Product> = tables.products.values().cloned().collect();
        products.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(products)
    }

    async fn find(&self, id: &str) -> StoreResult<Option<Product>> {
        Ok(self.tables.read().await.products.get(id).cloned())
    }

    async fn create(&self, product: Product) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if tables.products.contains_key(&product.id) {
            return Err(StoreError::DuplicateKey("products.id"));
        }
        tables.products.insert(product.id.clone(), product);
        Ok(())
    }

    async fn set_availability(&self, id: &str, available: bool) -> StoreResult<Option<Product>> {
        let mut tables = self.tables.write().await;
        match tables.products.get_mut(id) {
            Some(product) => {
                product.available = available;
                Ok(Some(product.clone()))
            }
            None => Ok(None),
        }
    }
}

#[async_trait]
impl CartRepository for MemoryStore {
    async fn get(&self, user_email: &str) -> StoreResult<Vec<CartItem>> {
        Ok(self
            .tables
            .read()
            .await
            .carts
            .get(user_email)
            .cloned()
            .unwrap_or_default())
    }

    async fn add_item(&self, user_email: &str, product_id: &str, quantity: u32) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        let cart = tables.carts.entry(user_email.to_string()).or_default();
        match cart.iter_mut().find(|item| item.product_id == product_id) {
            Some(item) => item.quantity += quantity,
            None => cart.push(CartItem {
                product_id: product_id.to_string(),
                quantity,
            }),
        }
        Ok(())
    }

    async fn clear(&self, user_email: &str) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        tables.carts.insert(user_email.to_string(), Vec::new());
        Ok(())
    }
}

#[async_trait]
impl OrderRepository for MemoryStore {
    async fn commit_checkout(
        &self,
        user_email: &str,
        expected_cart: &[CartItem],
        bundle: CheckoutBundle,
    ) -> StoreResult<()> {
        let mut tables = self.tables.write().await;

        // Compare-and-swap on the cart: the bundle was priced from the
        // snapshot in `expected_cart`, and nothing may have touched the
        // cart since.
        let unchanged = tables
            .carts
            .get(user_email)
            .map_or(expected_cart.is_empty(), |live| {
                live.as_slice() == expected_cart
            });
        if !unchanged {
            return Err(StoreError::Conflict("cart changed during checkout"));
        }

        let order_id = bundle.order.id;
        tables.orders.insert(order_id, bundle.order);
        tables.invoices.insert(bundle.invoice.id, bundle.invoice);
        tables.dispatches.insert(order_id, bundle.dispatch);
        tables.tracks.insert(order_id, bundle.track);
        tables.carts.insert(user_email.to_string(), Vec::new());
        Ok(())
    }

    async fn find_order(&self, id: Uuid) -> StoreResult<Option<Order>> {
        Ok(self.tables.read().await.orders.get(&id).cloned())
    }

    async fn list_orders(&self) -> StoreResult<Vec<Order>> {
        let tables = self.tables.read().await;
        let mut orders: Vec<Order> = tables.orders.values().cloned().collect();
        orders.sort_by_key(|order| order.created_at);
        Ok(orders)
    }

    async fn find_invoice_for_order(&self, order_id: Uuid) -> StoreResult<Option<Invoice>> {
        let tables = self.tables.read().await;
        Ok(tables
            .invoices
            .values()
            .find(|invoice| invoice.order_id == order_id)
            .cloned())
    }

    async fn find_dispatch(&self, order_id: Uuid) -> StoreResult<Option<Dispatch>> {
        Ok(self.tables.read().await.dispatches.get(&order_id).cloned())
    }

    async fn reassign_courier(
        &self,
        order_id: Uuid,
        courier: &str,
    ) -> StoreResult<Option<Dispatch>> {
        let mut tables = self.tables.write().await;
        match tables.dispatches.get_mut(&order_id) {
            Some(dispatch) => {
                dispatch.courier = courier.to_string();
                Ok(Some(dispatch.clone()))
            }
            None => Ok(None),
        }
    }

    async fn find_track(&self, order_id: Uuid) -> StoreResult<Option<Track>> {
        Ok(self.tables.read().await.tracks.get(&order_id).cloned())
    }

    async fn advance_delivery(&self, order_id: Uuid) -> StoreResult<Option<Track>> {
        let mut tables = self.tables.write().await;

        let Some(current) = tables.tracks.get(&order_id).map(|track| track.status) else {
            return Ok(None);
        };
        let Some(next) = current.next() else {
            // Delivered is terminal; report the track untouched.
            return Ok(tables.tracks.get(&order_id).cloned());
        };

        let now = Utc::now();
        if let Some(track) = tables.tracks.get_mut(&order_id) {
            track.status = next;
            track.updated_at = now;
        }
        if let Some(order) = tables.orders.get_mut(&order_id) {
            order.status = next.order_status();
        }
        if let Some(dispatch) = tables.dispatches.get_mut(&order_id) {
            dispatch.status = next;
        }
        Ok(tables.tracks.get(&order_id).cloned())
    }
}
