//! Order API Module
//!
//! Order submission and day listings.

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

/// Order router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        // Submit an order (numbers, prints, persists)
        .route("/", post(handler::submit))
        // All orders of one business day
        .route("/day/{day_key}", get(handler::day_summary))
        // Order detail
        .route("/{id}", get(handler::get_by_id))
}
