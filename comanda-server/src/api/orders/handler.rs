//! Order API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::core::ServerState;
use crate::db::models::{OrderRequest, ResolvedOrder};
use crate::orders::SubmitError;
use crate::printing::DispatchOutcome;
use crate::utils::{AppError, AppResult};

/// Outcome of one device, as reported to the counter terminal
#[derive(Debug, Serialize)]
pub struct PrintOutcome {
    pub device: String,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&DispatchOutcome> for PrintOutcome {
    fn from(outcome: &DispatchOutcome) -> Self {
        Self {
            device: outcome.device.clone(),
            ok: outcome.result.is_ok(),
            error: outcome.result.as_ref().err().map(|e| e.to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub order_id: String,
    pub day_key: String,
    pub sequence: u32,
    pub kitchen: Vec<PrintOutcome>,
    pub customer: Vec<PrintOutcome>,
}

/// Submit an order
pub async fn submit(
    State(state): State<ServerState>,
    Json(payload): Json<OrderRequest>,
) -> AppResult<Json<SubmitResponse>> {
    let receipt = state
        .service
        .submit_order(payload)
        .await
        .map_err(|e| match e {
            SubmitError::EmptyOrder => AppError::validation("Order has no lines"),
            SubmitError::NegativeDeliveryFee => {
                AppError::validation("Delivery fee cannot be negative")
            }
            SubmitError::Numbering(e) => AppError::database(e.to_string()),
            SubmitError::Persistence(e) => AppError::database(e.to_string()),
        })?;

    Ok(Json(SubmitResponse {
        order_id: receipt.order_id,
        day_key: receipt.day_key,
        sequence: receipt.sequence,
        kitchen: receipt.kitchen.iter().map(PrintOutcome::from).collect(),
        customer: receipt.customer.iter().map(PrintOutcome::from).collect(),
    }))
}

#[derive(Debug, Serialize)]
pub struct DaySummaryResponse {
    pub day_key: String,
    pub orders: Vec<ResolvedOrder>,
    pub total_cash: Decimal,
}

/// All orders of one business day with the cash total
pub async fn day_summary(
    State(state): State<ServerState>,
    Path(day_key): Path<String>,
) -> AppResult<Json<DaySummaryResponse>> {
    let summary = state
        .service
        .day_summary(&day_key)
        .map_err(|e| AppError::database(e.to_string()))?;

    Ok(Json(DaySummaryResponse {
        day_key,
        orders: summary.orders,
        total_cash: summary.total_cash,
    }))
}

/// Get order by id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ResolvedOrder>> {
    let order = state
        .service
        .get_order(&id)
        .map_err(|e| AppError::database(e.to_string()))?
        .ok_or_else(|| AppError::not_found(format!("Order {} not found", id)))?;
    Ok(Json(order))
}
