//! Client API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::StoreError;
use crate::db::models::{Client, SHOP_CLIENT_ID};
use crate::utils::{AppError, AppResult};

/// List all clients
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Client>>> {
    let clients = state
        .service
        .list_clients()
        .map_err(|e| AppError::database(e.to_string()))?;
    Ok(Json(clients))
}

/// Get client by primary number
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Client>> {
    let client = state
        .service
        .get_client(&id)
        .map_err(|e| AppError::database(e.to_string()))?
        .ok_or_else(|| AppError::not_found(format!("Client {} not found", id)))?;
    Ok(Json(client))
}

/// Create or update a client
pub async fn upsert(
    State(state): State<ServerState>,
    Json(payload): Json<Client>,
) -> AppResult<Json<Client>> {
    if payload.id.is_empty() {
        return Err(AppError::validation("Client id must not be empty"));
    }
    if payload.name.trim().is_empty() {
        return Err(AppError::validation("Client name must not be empty"));
    }

    state
        .service
        .upsert_client(&payload)
        .map_err(|e| AppError::database(e.to_string()))?;
    Ok(Json(payload))
}

/// Delete a client
pub async fn remove(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<String>> {
    if id == SHOP_CLIENT_ID {
        return Err(AppError::validation("The shop record cannot be deleted"));
    }

    state.service.delete_client(&id).map_err(|e| match e {
        StoreError::ClientNotFound(id) => AppError::not_found(format!("Client {} not found", id)),
        other => AppError::database(other.to_string()),
    })?;
    Ok(Json(id))
}
