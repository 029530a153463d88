//! Shared types for the ledger engine

use serde::{Deserialize, Serialize};

/// One (item, member, share) triple of an assignment save payload.
/// Shares are integer minor units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentInput {
    pub item_id: String,
    pub member_id: String,
    pub share_minor: i64,
}

/// An item plus the members explicitly selected for it. An empty
/// selection means "split among the whole group".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemSelection {
    pub item_id: String,
    pub price_minor: i64,
    #[serde(default)]
    pub member_ids: Vec<String>,
}

/// Per-member aggregate owed across every bill of the group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberTotal {
    pub id: String,
    pub name: String,
    pub total_owed_minor: i64,
}

/// Derived settlement view of a group, never stored independently.
/// `version` is the ledger version observed at read time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Summary {
    pub bill_count: i64,
    pub members: Vec<MemberTotal>,
    pub version: i64,
}
