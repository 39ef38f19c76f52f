//! Client API Module
//!
//! Client bookkeeping: primary number is the key, the secondary number
//! is kept in a lookup index.

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

/// Client router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/clients", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::upsert))
        .route("/{id}", get(handler::get_by_id).delete(handler::remove))
}
