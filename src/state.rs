//! Application state shared across handlers

use std::sync::Arc;

use crate::{
    jwt::JwtService,
    notify::Notifier,
    services::{AccountService, CartService, CatalogService, CheckoutService, DispatchService},
    store::MemoryStore,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub jwt: JwtService,
    pub accounts: AccountService,
    pub catalog: CatalogService,
    pub carts: CartService,
    pub checkout: CheckoutService,
    pub dispatch: DispatchService,
}

impl AppState {
    /// Wire every service to the same injected store and notifier.
    pub fn new(store: MemoryStore, jwt: JwtService, notifier: Arc<dyn Notifier>) -> Self {
        let store = Arc::new(store);
        AppState {
            jwt: jwt.clone(),
            accounts: AccountService::new(store.clone(), jwt),
            catalog: CatalogService::new(store.clone()),
            carts: CartService::new(store.clone(), store.clone()),
            checkout: CheckoutService::new(
                store.clone(),
                store.clone(),
                store.clone(),
                notifier.clone(),
            ),
            dispatch: DispatchService::new(store, notifier),
        }
    }
}
