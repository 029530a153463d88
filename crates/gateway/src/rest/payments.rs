//! Payment deep-link routes. Link generation only; executing payments is
//! out of scope.

use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

const DEFAULT_NOTE: &str = "AutoSplit";

/// Format integer minor units as a major-unit decimal string ("501" →
/// "5.01").
fn format_amount(amount_minor: i64) -> String {
    format!("{}.{:02}", amount_minor / 100, amount_minor % 100)
}

fn upi_deeplink(payee_upi: &str, payee_name: &str, amount_minor: i64, note: &str) -> String {
    format!(
        "upi://pay?pa={}&pn={}&am={}&cu=INR&tn={}",
        urlencoding::encode(payee_upi),
        urlencoding::encode(payee_name),
        format_amount(amount_minor),
        urlencoding::encode(note),
    )
}

fn venmo_deeplink(username: &str, amount_minor: i64, note: &str) -> String {
    format!(
        "https://venmo.com/?txn=pay&recipients={}&amount={}&note={}",
        urlencoding::encode(username),
        format_amount(amount_minor),
        urlencoding::encode(note),
    )
}

#[derive(Debug, Deserialize)]
pub struct UpiLinkRequest {
    pub upi: String,
    #[serde(default)]
    pub name: Option<String>,
    pub amount_minor: i64,
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UpiLinkResponse {
    pub upi_link: String,
}

pub async fn upi_link(Json(payload): Json<UpiLinkRequest>) -> Result<Json<UpiLinkResponse>, ApiError> {
    if payload.amount_minor < 0 {
        return Err(ApiError::bad_request("amount must not be negative"));
    }

    let name = payload.name.as_deref().unwrap_or("Friend");
    let note = payload.note.as_deref().unwrap_or(DEFAULT_NOTE);

    Ok(Json(UpiLinkResponse {
        upi_link: upi_deeplink(&payload.upi, name, payload.amount_minor, note),
    }))
}

#[derive(Debug, Deserialize)]
pub struct VenmoLinkRequest {
    pub venmo_id: String,
    pub amount_minor: i64,
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct VenmoLinkResponse {
    pub venmo_link: String,
}

pub async fn venmo_link(
    Json(payload): Json<VenmoLinkRequest>,
) -> Result<Json<VenmoLinkResponse>, ApiError> {
    if payload.amount_minor < 0 {
        return Err(ApiError::bad_request("amount must not be negative"));
    }

    let note = payload.note.as_deref().unwrap_or(DEFAULT_NOTE);

    Ok(Json(VenmoLinkResponse {
        venmo_link: venmo_deeplink(&payload.venmo_id, payload.amount_minor, note),
    }))
}
