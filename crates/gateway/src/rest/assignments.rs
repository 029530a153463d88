//! Assignment save, split preview, and summary routes: the ledger
//! surface of the API.

use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use autosplit_ledger::{compute_shares, AssignmentInput, ItemSelection, LedgerError, Summary};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SaveAssignmentsRequest {
    pub group_id: String,
    pub assignments: Vec<AssignmentInput>,
}

#[derive(Debug, Serialize)]
pub struct SaveAssignmentsResponse {
    pub version: i64,
}

/// Replace the assignment sets of the referenced items and return the new
/// ledger version. The version is also advertised to the group's room as
/// a `ledger_updated` event.
pub async fn save_assignments(
    State(state): State<AppState>,
    Json(payload): Json<SaveAssignmentsRequest>,
) -> Result<Json<SaveAssignmentsResponse>, ApiError> {
    let version = state
        .coordinator
        .save_assignments(&payload.group_id, &payload.assignments)
        .await?;
    Ok(Json(SaveAssignmentsResponse { version }))
}

#[derive(Debug, Deserialize)]
pub struct SelectionRequest {
    pub item_id: String,
    #[serde(default)]
    pub member_ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct PreviewRequest {
    pub group_id: String,
    pub selections: Vec<SelectionRequest>,
}

#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    pub assignments: Vec<AssignmentInput>,
}

/// Compute the assignment payload for a set of item selections without
/// persisting anything. An empty selection splits the item across the
/// whole group.
pub async fn preview_assignments(
    State(state): State<AppState>,
    Json(payload): Json<PreviewRequest>,
) -> Result<Json<PreviewResponse>, ApiError> {
    let group = state
        .groups
        .find_by_public_id(&payload.group_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("group {} not found", payload.group_id)))?;

    let items = state.bills.items_of_group(group.group.id).await?;
    let prices: HashMap<&str, i64> = items
        .iter()
        .map(|item| (item.public_id.as_str(), item.price_minor))
        .collect();

    let selections = payload
        .selections
        .iter()
        .map(|selection| {
            let price_minor = prices.get(selection.item_id.as_str()).copied().ok_or_else(|| {
                LedgerError::Validation(format!(
                    "item {} does not belong to this group",
                    selection.item_id
                ))
            })?;
            Ok(ItemSelection {
                item_id: selection.item_id.clone(),
                price_minor,
                member_ids: selection.member_ids.clone(),
            })
        })
        .collect::<Result<Vec<_>, LedgerError>>()?;

    let member_ids: Vec<String> = group
        .members
        .iter()
        .map(|member| member.public_id.clone())
        .collect();

    let assignments = compute_shares(&selections, &member_ids)?;
    Ok(Json(PreviewResponse { assignments }))
}

#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    /// Causal token from a prior save: the reader's own save returned this
    /// version, so the summary should reflect at least that much.
    pub min_version: Option<i64>,
}

/// Read the group's settlement summary. Clients should also call this on
/// regaining foreground activity, since `ledger_updated` delivery is
/// best-effort.
pub async fn summary(
    State(state): State<AppState>,
    Path(group_id): Path<String>,
    Query(query): Query<SummaryQuery>,
) -> Result<Json<Summary>, ApiError> {
    let summary = state
        .coordinator
        .summary(&group_id, query.min_version)
        .await?;
    Ok(Json(summary))
}
