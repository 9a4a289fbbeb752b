//! Checkout: cart -> payment decision -> atomic order commit

use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    middleware::AuthUser,
    models::{Dispatch, Invoice, Order, OrderItem, OrderStatus, Track, TrackStatus},
    notify::Notifier,
    payment::{self, PaymentAttempt, PaymentDecision},
    store::{CartRepository, CheckoutBundle, OrderRepository, ProductRepository},
};

/// Courier every new order starts with; admins reassign from here.
pub const DEFAULT_COURIER: &str = "Repartidor A";

/// Result of a checkout attempt. A declined payment is an expected
/// business outcome, not an error.
#[derive(Debug, Clone)]
pub enum CheckoutOutcome {
    Approved {
        order_id: Uuid,
        invoice_id: Uuid,
        total: i64,
    },
    Declined {
        message: String,
    },
}

/// Checkout service
#[derive(Clone)]
pub struct CheckoutService {
    products: Arc<dyn ProductRepository>,
    carts: Arc<dyn CartRepository>,
    orders: Arc<dyn OrderRepository>,
    notifier: Arc<dyn Notifier>,
}

impl CheckoutService {
    pub fn new(
        products: Arc<dyn ProductRepository>,
        carts: Arc<dyn CartRepository>,
        orders: Arc<dyn OrderRepository>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            products,
            carts,
            orders,
            notifier,
        }
    }

    /// Convert the requester's cart into a paid order.
    ///
    /// On approval the order, invoice, dispatch and tracking records are
    /// committed together with the cart-clear as one store transaction;
    /// a decline leaves the cart untouched and creates nothing.
    pub async fn checkout(
        &self,
        requester: &AuthUser,
        attempt: &PaymentAttempt,
    ) -> ApiResult<CheckoutOutcome> {
        let cart = self.carts.get(&requester.email).await?;
        if cart.is_empty() {
            return Err(ApiError::EmptyCart);
        }

        if attempt.card_number.trim().is_empty() {
            return Err(ApiError::InvalidInput("card number is required".to_string()));
        }

        if let PaymentDecision::Declined { reason } = payment::authorize(attempt) {
            info!(user = %requester.email, "payment declined");
            return Ok(CheckoutOutcome::Declined { message: reason });
        }

        // Price every line against the catalog as it stands right now;
        // add-time prices and availability do not count.
        let mut items = Vec::with_capacity(cart.len());
        let mut total: i64 = 0;
        for line in &cart {
            let product = self
                .products
                .find(&line.product_id)
                .await?
                .filter(|product| product.available)
                .ok_or_else(|| ApiError::ProductUnavailable(line.product_id.clone()))?;

            let subtotal = product.price * i64::from(line.quantity);
            total += subtotal;
            items.push(OrderItem {
                product_id: product.id,
                name: product.name,
                unit_price: product.price,
                quantity: line.quantity,
                subtotal,
            });
        }

        let now = Utc::now();
        let order = Order {
            id: Uuid::new_v4(),
            user_email: requester.email.clone(),
            items,
            total,
            status: OrderStatus::Paid,
            created_at: now,
        };
        let invoice = Invoice {
            id: Uuid::new_v4(),
            order_id: order.id,
            recipient: requester.email.clone(),
            total,
            issued_at: now,
        };
        let dispatch = Dispatch {
            order_id: order.id,
            courier: DEFAULT_COURIER.to_string(),
            status: TrackStatus::Prep,
        };
        let track = Track {
            order_id: order.id,
            status: TrackStatus::Prep,
            updated_at: now,
        };

        let (order_id, invoice_id) = (order.id, invoice.id);
        self.orders
            .commit_checkout(
                &requester.email,
                &cart,
                CheckoutBundle {
                    order,
                    invoice,
                    dispatch,
                    track,
                },
            )
            .await?;

        info!(user = %requester.email, %order_id, total, "checkout committed");
        self.notifier
            .send(
                &requester.email,
                &format!("Invoice #{invoice_id}"),
                &format!("Order {order_id} paid, total {total}"),
            )
            .await;

        Ok(CheckoutOutcome::Approved {
            order_id,
            invoice_id,
            total,
        })
    }

    /// Fetch an invoice; only its recipient or an admin may read it.
    pub async fn invoice(&self, requester: &AuthUser, order_id: Uuid) -> ApiResult<Invoice> {
        let invoice = self
            .orders
            .find_invoice_for_order(order_id)
            .await?
            .ok_or(ApiError::NotFound("invoice"))?;

        requester.require_owner_or_admin(&invoice.recipient)?;
        Ok(invoice)
    }

    /// Re-deliver an existing invoice. The invoice itself, issuance
    /// timestamp included, is never altered.
    pub async fn resend_invoice(&self, requester: &AuthUser, order_id: Uuid) -> ApiResult<()> {
        let invoice = self.invoice(requester, order_id).await?;

        info!(invoice = %invoice.id, recipient = %invoice.recipient, "invoice resent");
        self.notifier
            .send(
                &invoice.recipient,
                &format!("Invoice #{} (copy)", invoice.id),
                &format!("Copy of the invoice for order {}", invoice.order_id),
            )
            .await;
        Ok(())
    }
}
