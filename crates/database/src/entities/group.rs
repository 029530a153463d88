//! Group entity definitions

use serde::{Deserialize, Serialize};

use super::member::{CreateMemberRequest, Member};

/// A settlement group. Membership is fixed at creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: i64,
    pub public_id: String,
    pub name: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateGroupRequest {
    pub name: String,
    #[serde(default)]
    pub members: Vec<CreateMemberRequest>,
}

/// A group together with its member roster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupWithMembers {
    pub group: Group,
    pub members: Vec<Member>,
}
