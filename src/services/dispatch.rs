//! Dispatch and delivery tracking state machine

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    middleware::AuthUser,
    models::{Dispatch, Order, Track},
    notify::Notifier,
    store::OrderRepository,
};

/// Dispatch service
#[derive(Clone)]
pub struct DispatchService {
    orders: Arc<dyn OrderRepository>,
    notifier: Arc<dyn Notifier>,
}

impl DispatchService {
    pub fn new(orders: Arc<dyn OrderRepository>, notifier: Arc<dyn Notifier>) -> Self {
        Self { orders, notifier }
    }

    /// Admin-only: hand an order's delivery to a different courier.
    pub async fn reassign_courier(
        &self,
        requester: &AuthUser,
        order_id: Uuid,
        courier: &str,
    ) -> ApiResult<Dispatch> {
        requester.require_admin()?;

        if courier.trim().is_empty() {
            return Err(ApiError::InvalidInput("courier name is required".to_string()));
        }

        let dispatch = self
            .orders
            .reassign_courier(order_id, courier)
            .await?
            .ok_or(ApiError::NotFound("dispatch"))?;

        info!(%order_id, courier, "courier reassigned");
        self.notifier
            .send(
                courier,
                "Delivery assignment",
                &format!("Order {order_id} is now assigned to you"),
            )
            .await;
        Ok(dispatch)
    }

    /// Apply one forward delivery transition (Prep -> OnRoute ->
    /// Delivered). The order's owner or an admin may advance it; once
    /// delivered, further calls succeed without changing anything.
    pub async fn advance(&self, requester: &AuthUser, order_id: Uuid) -> ApiResult<Track> {
        let order = self
            .orders
            .find_order(order_id)
            .await?
            .ok_or(ApiError::NotFound("order"))?;
        requester.require_owner_or_admin(&order.user_email)?;

        let track = self
            .orders
            .advance_delivery(order_id)
            .await?
            .ok_or(ApiError::NotFound("tracking"))?;

        info!(%order_id, status = ?track.status, "delivery advanced");
        Ok(track)
    }

    /// Current delivery progress, visible to the owner or an admin.
    pub async fn tracking(&self, requester: &AuthUser, order_id: Uuid) -> ApiResult<Track> {
        let order = self
            .orders
            .find_order(order_id)
            .await?
            .ok_or(ApiError::NotFound("order"))?;
        requester.require_owner_or_admin(&order.user_email)?;

        self.orders
            .find_track(order_id)
            .await?
            .ok_or(ApiError::NotFound("tracking"))
    }

    /// Admin-only: every order in the system, oldest first.
    pub async fn list_orders(&self, requester: &AuthUser) -> ApiResult<Vec<Order>> {
        requester.require_admin()?;
        Ok(self.orders.list_orders().await?)
    }
}
