//! Bill intake route: the narrow interface accepting the document
//! parser's finished output.

use axum::{extract::State, Json};
use serde::Serialize;

use autosplit_database::{BillWithItems, CreateBillRequest, Item};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ItemResponse {
    pub id: String,
    pub description: String,
    pub price_minor: i64,
}

impl From<Item> for ItemResponse {
    fn from(value: Item) -> Self {
        Self {
            id: value.public_id,
            description: value.description,
            price_minor: value.price_minor,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BillResponse {
    pub id: String,
    pub group_id: String,
    pub total_minor: Option<i64>,
    pub items: Vec<ItemResponse>,
}

fn bill_response(value: BillWithItems, group_public_id: String) -> BillResponse {
    BillResponse {
        id: value.bill.public_id,
        group_id: group_public_id,
        total_minor: value.bill.total_minor,
        items: value.items.into_iter().map(ItemResponse::from).collect(),
    }
}

/// Store a parsed bill with its priced line items for a group.
pub async fn create_bill(
    State(state): State<AppState>,
    Json(payload): Json<CreateBillRequest>,
) -> Result<Json<BillResponse>, ApiError> {
    let group_public_id = payload.group_id.clone();
    let created = state.bills.create(&payload).await?;
    Ok(Json(bill_response(created, group_public_id)))
}
