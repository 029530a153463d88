//! Bill entity definitions

use serde::{Deserialize, Serialize};

use super::item::{CreateItemRequest, Item};

/// A bill produced by the external document-parsing collaborator.
/// Immutable once created; `total_minor` is the parser's detected total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bill {
    pub id: i64,
    pub public_id: String,
    pub group_id: i64,
    pub total_minor: Option<i64>,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBillRequest {
    /// Public id of the group the bill belongs to.
    pub group_id: String,
    #[serde(default)]
    pub total_minor: Option<i64>,
    pub items: Vec<CreateItemRequest>,
}

/// A bill together with its ordered line items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillWithItems {
    pub bill: Bill,
    pub items: Vec<Item>,
}
