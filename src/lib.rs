//! La Fornace order service
//!
//! Order-taking and fulfillment backend for a pizzeria: registration and
//! login with lockout, a product catalog, per-user carts, a simulated
//! checkout that issues invoices, and a dispatch/tracking state machine
//! for delivery. Persistence sits behind repository traits (`store`), so
//! the in-memory store can be swapped for a real database without
//! touching the services.

pub mod config;
pub mod error;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod notify;
pub mod password;
pub mod payment;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;
pub mod validation;
