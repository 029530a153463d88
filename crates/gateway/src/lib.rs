//! AutoSplit Gateway Crate
//!
//! The HTTP and WebSocket surface of the backend: group/bill intake,
//! assignment saves and summaries, payment deep links, and the per-group
//! realtime channel. Also home of the consistency coordinator that ties
//! ledger saves to room notifications.

use axum::{
    http::Method,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

pub mod coordinator;
pub mod error;
pub mod rest;
pub mod state;
pub mod websocket;

pub use coordinator::Coordinator;
pub use error::ApiError;
pub use state::AppState;

/// Assemble the API router over the shared application state.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(rest::health::health))
        .route("/api/groups", post(rest::groups::create_group))
        .route("/api/groups/:group_id", get(rest::groups::get_group))
        .route("/api/groups/:group_id/summary", get(rest::assignments::summary))
        .route("/api/bills", post(rest::bills::create_bill))
        .route("/api/assignments", post(rest::assignments::save_assignments))
        .route(
            "/api/assignments/preview",
            post(rest::assignments::preview_assignments),
        )
        .route("/api/pay/upi", post(rest::payments::upi_link))
        .route("/api/pay/venmo", post(rest::payments::venmo_link))
        .route("/api/ws", get(websocket::websocket_handler))
        .with_state(state)
        .layer(cors)
}
