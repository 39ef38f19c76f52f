//! Health API Module

use axum::{Json, Router, extract::State, routing::get};

use crate::core::ServerState;
use crate::service::ServiceStatus;

/// Health router
pub fn router() -> Router<ServerState> {
    Router::new().route("/api/health", get(status))
}

/// Printer fleet and day-counter status
async fn status(State(state): State<ServerState>) -> Json<ServiceStatus> {
    Json(state.service.status())
}
