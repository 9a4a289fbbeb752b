//! Per-user cart mutation ahead of checkout

use std::sync::Arc;

use crate::{
    error::{ApiError, ApiResult},
    middleware::AuthUser,
    models::CartItem,
    store::{CartRepository, ProductRepository},
    validation,
};

/// Cart service
#[derive(Clone)]
pub struct CartService {
    products: Arc<dyn ProductRepository>,
    carts: Arc<dyn CartRepository>,
}

impl CartService {
    pub fn new(products: Arc<dyn ProductRepository>, carts: Arc<dyn CartRepository>) -> Self {
        Self { products, carts }
    }

    pub async fn get(&self, requester: &AuthUser) -> ApiResult<Vec<CartItem>> {
        Ok(self.carts.get(&requester.email).await?)
    }

    /// Add a product to the requester's cart. Availability is checked at
    /// add time for early feedback, but checkout re-validates it at
    /// commit time regardless.
    pub async fn add(&self, requester: &AuthUser, product_id: &str, quantity: u32) -> ApiResult<()> {
        validation::validate_quantity(quantity).map_err(ApiError::InvalidInput)?;

        let available = self
            .products
            .find(product_id)
            .await?
            .is_some_and(|product| product.available);
        if !available {
            return Err(ApiError::ProductUnavailable(product_id.to_string()));
        }

        self.carts
            .add_item(&requester.email, product_id, quantity)
            .await?;
        Ok(())
    }

    /// Empty the cart. Idempotent.
    pub async fn clear(&self, requester: &AuthUser) -> ApiResult<()> {
        self.carts.clear(&requester.email).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use crate::store::MemoryStore;
    use uuid::Uuid;

    fn auth(email: &str) -> AuthUser {
        AuthUser {
            id: Uuid::new_v4(),
            email: email.to_string(),
            role: Role::Customer,
        }
    }

    async fn service() -> (CartService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        store.seed_demo_menu().await;
        (CartService::new(store.clone(), store.clone()), store)
    }

    #[tokio::test]
    async fn repeated_add_merges_quantity() {
        let (carts, _) = service().await;
        let user = auth("a@x.com");

        carts.add(&user, "p1", 2).await.unwrap();
        carts.add(&user, "p1", 1).await.unwrap();
        carts.add(&user, "p2", 1).await.unwrap();

        let cart = carts.get(&user).await.unwrap();
        assert_eq!(cart.len(), 2);
        assert_eq!(cart[0].quantity, 3);
    }

    #[tokio::test]
    async fn zero_quantity_is_invalid_input() {
        let (carts, _) = service().await;
        let err = carts.add(&auth("a@x.com"), "p1", 0).await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn missing_or_unavailable_product_rejected() {
        let (carts, store) = service().await;
        let user = auth("a@x.com");

        assert!(matches!(
            carts.add(&user, "nope", 1).await,
            Err(ApiError::ProductUnavailable(_))
        ));

        store.set_availability("p1", false).await.unwrap();
        assert!(matches!(
            carts.add(&user, "p1", 1).await,
            Err(ApiError::ProductUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn carts_are_scoped_per_user() {
        let (carts, _) = service().await;
        carts.add(&auth("a@x.com"), "p1", 1).await.unwrap();

        assert!(carts.get(&auth("b@x.com")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn clear_is_idempotent() {
        let (carts, _) = service().await;
        let user = auth("a@x.com");

        carts.add(&user, "p1", 1).await.unwrap();
        carts.clear(&user).await.unwrap();
        carts.clear(&user).await.unwrap();
        assert!(carts.get(&user).await.unwrap().is_empty());
    }
}
