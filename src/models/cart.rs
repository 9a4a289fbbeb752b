//! Cart line items

use serde::{Deserialize, Serialize};

/// One product-quantity entry in a user's cart. Prices are not stored
/// here; checkout re-reads them from the catalog at commit time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: String,
    pub quantity: u32,
}
