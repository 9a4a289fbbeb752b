//! Domain models for the order and fulfillment lifecycle

pub mod cart;
pub mod order;
pub mod product;
pub mod user;

// Re-export for convenience
pub use cart::CartItem;
pub use order::{Dispatch, Invoice, Order, OrderItem, OrderStatus, Track, TrackStatus};
pub use product::{NewProduct, Product};
pub use user::{Role, User};
