//! Item entity definitions

use serde::{Deserialize, Serialize};

/// A priced line item on a bill. `price_minor` is in integer minor units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: i64,
    pub public_id: String,
    pub bill_id: i64,
    pub description: String,
    pub price_minor: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateItemRequest {
    pub description: String,
    pub price_minor: i64,
}
