//! Group creation and retrieval routes

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use autosplit_database::{CreateGroupRequest, GroupWithMembers, Member};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct MemberResponse {
    pub id: String,
    pub name: String,
    pub upi_id: Option<String>,
    pub venmo_id: Option<String>,
}

impl From<Member> for MemberResponse {
    fn from(value: Member) -> Self {
        Self {
            id: value.public_id,
            name: value.name,
            upi_id: value.upi_id,
            venmo_id: value.venmo_id,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GroupResponse {
    pub id: String,
    pub name: String,
    pub members: Vec<MemberResponse>,
}

impl From<GroupWithMembers> for GroupResponse {
    fn from(value: GroupWithMembers) -> Self {
        Self {
            id: value.group.public_id,
            name: value.group.name,
            members: value.members.into_iter().map(MemberResponse::from).collect(),
        }
    }
}

/// Create a group with its member roster. Membership is fixed at
/// creation.
pub async fn create_group(
    State(state): State<AppState>,
    Json(payload): Json<CreateGroupRequest>,
) -> Result<Json<GroupResponse>, ApiError> {
    let created = state.groups.create(&payload).await?;
    Ok(Json(created.into()))
}

/// Fetch a group and its members by public id.
pub async fn get_group(
    State(state): State<AppState>,
    Path(group_id): Path<String>,
) -> Result<Json<GroupResponse>, ApiError> {
    let group = state
        .groups
        .find_by_public_id(&group_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("group {group_id} not found")))?;
    Ok(Json(group.into()))
}
