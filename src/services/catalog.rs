//! Menu catalog: listing plus admin-only management

use std::sync::Arc;

use tracing::info;

use crate::{
    error::{ApiError, ApiResult},
    middleware::AuthUser,
    models::{NewProduct, Product},
    store::{ProductRepository, StoreError},
};

/// Catalog service
#[derive(Clone)]
pub struct CatalogService {
    products: Arc<dyn ProductRepository>,
}

impl CatalogService {
    pub fn new(products: Arc<dyn ProductRepository>) -> Self {
        Self { products }
    }

    /// Full menu, unavailable products included (they still render, just
    /// cannot be ordered).
    pub async fn list(&self) -> ApiResult<Vec<Product>> {
        Ok(self.products.list().await?)
    }

    /// Admin-only: add a product to the menu.
    pub async fn create(&self, requester: &AuthUser, new: NewProduct) -> ApiResult<Product> {
        requester.require_admin()?;

        if new.id.trim().is_empty() || new.name.trim().is_empty() {
            return Err(ApiError::InvalidInput(
                "product id and name are required".to_string(),
            ));
        }
        if new.price <= 0 {
            return Err(ApiError::InvalidInput(
                "price must be a positive amount in minor units".to_string(),
            ));
        }

        let product = Product {
            id: new.id,
            name: new.name,
            description: new.description,
            price: new.price,
            available: new.available,
        };

        self.products
            .create(product.clone())
            .await
            .map_err(|e| match e {
                StoreError::DuplicateKey(_) => {
                    ApiError::InvalidInput("product id already exists".to_string())
                }
                other => ApiError::from(other),
            })?;

        info!(product = %product.id, price = product.price, "product created");
        Ok(product)
    }

    /// Admin-only: flip a product's availability flag.
    pub async fn set_availability(
        &self,
        requester: &AuthUser,
        product_id: &str,
        available: bool,
    ) -> ApiResult<Product> {
        requester.require_admin()?;

        let product = self
            .products
            .set_availability(product_id, available)
            .await?
            .ok_or(ApiError::NotFound("product"))?;

        info!(product = %product.id, available, "availability changed");
        Ok(product)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use crate::store::MemoryStore;
    use uuid::Uuid;

    fn auth(role: Role) -> AuthUser {
        AuthUser {
            id: Uuid::new_v4(),
            email: "a@x.com".to_string(),
            role,
        }
    }

    fn new_product(id: &str) -> NewProduct {
        NewProduct {
            id: id.to_string(),
            name: "Diavola".to_string(),
            description: Some("spicy salami".to_string()),
            price: 10990,
            available: true,
        }
    }

    #[tokio::test]
    async fn listing_includes_unavailable_products() {
        let store = Arc::new(MemoryStore::new());
        store.seed_demo_menu().await;
        let catalog = CatalogService::new(store.clone());

        catalog
            .set_availability(&auth(Role::Admin), "p1", false)
            .await
            .unwrap();

        let menu = catalog.list().await.unwrap();
        assert_eq!(menu.len(), 3);
        assert!(menu.iter().any(|p| p.id == "p1" && !p.available));
    }

    #[tokio::test]
    async fn create_is_admin_only() {
        let store = Arc::new(MemoryStore::new());
        let catalog = CatalogService::new(store);

        let err = catalog
            .create(&auth(Role::Customer), new_product("p9"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Forbidden));

        let created = catalog
            .create(&auth(Role::Admin), new_product("p9"))
            .await
            .unwrap();
        assert_eq!(created.price, 10990);
    }

    #[tokio::test]
    async fn create_rejects_duplicates_and_bad_prices() {
        let store = Arc::new(MemoryStore::new());
        store.seed_demo_menu().await;
        let catalog = CatalogService::new(store);

        assert!(matches!(
            catalog.create(&auth(Role::Admin), new_product("p1")).await,
            Err(ApiError::InvalidInput(_))
        ));

        let mut free = new_product("p9");
        free.price = 0;
        assert!(matches!(
            catalog.create(&auth(Role::Admin), free).await,
            Err(ApiError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn availability_unknown_product_is_not_found() {
        let store = Arc::new(MemoryStore::new());
        let catalog = CatalogService::new(store);

        let err = catalog
            .set_availability(&auth(Role::Admin), "missing", false)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }
}
