//! Repository traits over the injected datastore
//!
//! Business logic only ever sees these traits, so swapping the in-memory
//! store for a real database touches nothing above this layer. The
//! checkout commit is the one multi-entity transaction and gets its own
//! unit-of-work method on [`OrderRepository`].

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{CartItem, Dispatch, Invoice, Order, Product, Track, User};

pub mod memory;

pub use memory::MemoryStore;

/// Infrastructure-level store failure. Business-rule violations never map
/// to this type.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A compare-and-swap precondition failed, e.g. the cart changed
    /// between pricing and commit.
    #[error("store conflict: {0}")]
    Conflict(&'static str),

    /// A uniqueness constraint was violated.
    #[error("duplicate key: {0}")]
    DuplicateKey(&'static str),

    /// The backing store is unreachable or failed mid-operation.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Type alias for store results
pub type StoreResult<T> = Result<T, StoreError>;

/// User persistence, keyed by email
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Number of registered users.
    async fn count(&self) -> StoreResult<usize>;

    /// Insert a new user; fails with `DuplicateKey` if the email is taken.
    async fn create(&self, user: User) -> StoreResult<()>;

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Overwrite the stored user with the same email.
    async fn update(&self, user: &User) -> StoreResult<()>;
}

/// Product persistence
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn list(&self) -> StoreResult<Vec<Product>>;

    async fn find(&self, id: &str) -> StoreResult<Option<Product>>;

    /// Insert a new product; fails with `DuplicateKey` on an existing id.
    async fn create(&self, product: Product) -> StoreResult<()>;

    /// Flip the availability flag; `None` if the product is unknown.
    async fn set_availability(&self, id: &str, available: bool) -> StoreResult<Option<Product>>;
}

/// Cart persistence, one cart per user
#[async_trait]
pub trait CartRepository: Send + Sync {
    async fn get(&self, user_email: &str) -> StoreResult<Vec<CartItem>>;

    /// Merge `quantity` into an existing line for the product, or append a
    /// new line. The merge happens under the store lock.
    async fn add_item(&self, user_email: &str, product_id: &str, quantity: u32) -> StoreResult<()>;

    async fn clear(&self, user_email: &str) -> StoreResult<()>;
}

/// The full set of records created by one successful checkout.
#[derive(Debug, Clone)]
pub struct CheckoutBundle {
    pub order: Order,
    pub invoice: Invoice,
    pub dispatch: Dispatch,
    pub track: Track,
}

/// Order aggregate persistence, including the checkout unit of work and
/// the delivery state machine's atomic transition.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Atomically persist the checkout bundle and clear the user's cart.
    ///
    /// `expected_cart` is the snapshot the bundle was priced from; the
    /// commit fails with `Conflict` if the live cart no longer matches,
    /// so at most one checkout can succeed per cart-clearing event.
    async fn commit_checkout(
        &self,
        user_email: &str,
        expected_cart: &[CartItem],
        bundle: CheckoutBundle,
    ) -> StoreResult<()>;

    async fn find_order(&self, id: Uuid) -> StoreResult<Option<Order>>;

    async fn list_orders(&self) -> StoreResult<Vec<Order>>;

    async fn find_invoice_for_order(&self, order_id: Uuid) -> StoreResult<Option<Invoice>>;

    async fn find_dispatch(&self, order_id: Uuid) -> StoreResult<Option<Dispatch>>;

    /// Overwrite the courier on an order's dispatch record; `None` if no
    /// dispatch exists for the order.
    async fn reassign_courier(&self, order_id: Uuid, courier: &str)
        -> StoreResult<Option<Dispatch>>;

    async fn find_track(&self, order_id: Uuid) -> StoreResult<Option<Track>>;

    /// Apply exactly one forward delivery transition under the store lock,
    /// keeping order and dispatch status in step. Returns the track after
    /// the call; an already-delivered track comes back unchanged.
    async fn advance_delivery(&self, order_id: Uuid) -> StoreResult<Option<Track>>;
}
