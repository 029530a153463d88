//! Member entity definitions

use serde::{Deserialize, Serialize};

/// A group member. The `upi_id`/`venmo_id` fields are opaque external
/// payment identifiers passed through to the payment-link builders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub id: i64,
    pub public_id: String,
    pub group_id: i64,
    pub name: String,
    pub upi_id: Option<String>,
    pub venmo_id: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMemberRequest {
    pub name: String,
    #[serde(default)]
    pub upi_id: Option<String>,
    #[serde(default)]
    pub venmo_id: Option<String>,
}
