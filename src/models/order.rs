//! Order aggregate: order, invoice, dispatch and tracking records
//!
//! The four records are created together at checkout and, past that point,
//! are mutated only through the delivery state machine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Order payment/fulfillment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Paid,
    Shipped,
    Delivered,
}

/// Delivery progress. Transitions are monotonic and one-directional:
/// Prep -> OnRoute -> Delivered, with Delivered terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrackStatus {
    Prep,
    OnRoute,
    Delivered,
}

impl TrackStatus {
    /// Next state in the delivery lifecycle, or `None` once delivered.
    pub fn next(self) -> Option<TrackStatus> {
        match self {
            TrackStatus::Prep => Some(TrackStatus::OnRoute),
            TrackStatus::OnRoute => Some(TrackStatus::Delivered),
            TrackStatus::Delivered => None,
        }
    }

    /// Order status that mirrors this delivery state.
    pub fn order_status(self) -> OrderStatus {
        match self {
            TrackStatus::Prep => OrderStatus::Paid,
            TrackStatus::OnRoute => OrderStatus::Shipped,
            TrackStatus::Delivered => OrderStatus::Delivered,
        }
    }
}

/// One order line, snapshotted at checkout time and immune to later
/// catalog changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: String,
    pub name: String,
    pub unit_price: i64,
    pub quantity: u32,
    pub subtotal: i64,
}

/// Order entity. Items and total never change after creation; status is
/// mutated only by the delivery state machine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub user_email: String,
    pub items: Vec<OrderItem>,
    pub total: i64,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

/// Invoice entity, issued exactly once per order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    pub id: Uuid,
    pub order_id: Uuid,
    pub recipient: String,
    pub total: i64,
    pub issued_at: DateTime<Utc>,
}

/// Courier assignment for an order's physical delivery
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dispatch {
    pub order_id: Uuid,
    pub courier: String,
    pub status: TrackStatus,
}

/// Customer/admin-visible delivery progress for an order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    pub order_id: Uuid,
    pub status: TrackStatus,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delivery_states_advance_one_way() {
        assert_eq!(TrackStatus::Prep.next(), Some(TrackStatus::OnRoute));
        assert_eq!(TrackStatus::OnRoute.next(), Some(TrackStatus::Delivered));
        assert_eq!(TrackStatus::Delivered.next(), None);
    }

    #[test]
    fn order_status_mirrors_delivery_state() {
        assert_eq!(TrackStatus::Prep.order_status(), OrderStatus::Paid);
        assert_eq!(TrackStatus::OnRoute.order_status(), OrderStatus::Shipped);
        assert_eq!(TrackStatus::Delivered.order_status(), OrderStatus::Delivered);
    }
}
