//! Service layer: business rules over the repository traits

pub mod accounts;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod dispatch;

// Re-export for convenience
pub use accounts::{AccountService, SessionGrant};
pub use cart::CartService;
pub use catalog::CatalogService;
pub use checkout::{CheckoutOutcome, CheckoutService};
pub use dispatch::DispatchService;
