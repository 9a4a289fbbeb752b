//! Product (menu) model

use serde::{Deserialize, Serialize};

/// Menu product. Prices are integer minor currency units and immutable
/// after creation; only availability is toggled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub price: i64,
    pub available: bool,
}

/// New product creation payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProduct {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: i64,
    #[serde(default = "default_available")]
    pub available: bool,
}

fn default_available() -> bool {
    true
}
