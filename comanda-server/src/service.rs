//! Application service facade
//!
//! One object the API layer talks to: order submission, day listings
//! and client bookkeeping.

use crate::db::models::{Client, OrderRequest, ResolvedOrder};
use crate::db::{Store, StoreResult};
use crate::orders::{OrderPipeline, OrderSequencer, SubmitError, SubmitReceipt};
use comanda_printer::NetworkPrinter;
use rust_decimal::Decimal;
use serde::Serialize;

/// Printer fleet status for health reporting
#[derive(Debug, Serialize)]
pub struct ServiceStatus {
    pub devices: Vec<String>,
    pub ready_devices: usize,
    pub current_day_key: String,
}

/// Orders of one day with the cash total
pub struct DaySummary {
    pub orders: Vec<ResolvedOrder>,
    pub total_cash: Decimal,
}

/// Cash taken over a set of orders. The day report counts order totals
/// only; delivery surcharges are passed through to the courier and stay
/// out of the till.
fn day_cash_total(orders: &[ResolvedOrder]) -> Decimal {
    orders.iter().map(|o| o.total).sum()
}

pub struct OrderService {
    store: Store,
    sequencer: OrderSequencer,
    pipeline: OrderPipeline<NetworkPrinter>,
}

impl OrderService {
    pub fn new(
        store: Store,
        sequencer: OrderSequencer,
        pipeline: OrderPipeline<NetworkPrinter>,
    ) -> Self {
        Self {
            store,
            sequencer,
            pipeline,
        }
    }

    pub async fn submit_order(&self, request: OrderRequest) -> Result<SubmitReceipt, SubmitError> {
        self.pipeline.submit(request).await
    }

    /// Orders of one business day, with the cash total (delivery excluded)
    pub fn day_summary(&self, day_key: &str) -> StoreResult<DaySummary> {
        let orders = self.store.orders_for_day(day_key)?;
        let total_cash = day_cash_total(&orders);
        Ok(DaySummary { orders, total_cash })
    }

    pub fn get_order(&self, id: &str) -> StoreResult<Option<ResolvedOrder>> {
        self.store.get_order(id)
    }

    // ========== Clients ==========

    pub fn get_client(&self, id: &str) -> StoreResult<Option<Client>> {
        self.store.get_client(id)
    }

    pub fn list_clients(&self) -> StoreResult<Vec<Client>> {
        self.store.list_clients()
    }

    pub fn upsert_client(&self, client: &Client) -> StoreResult<()> {
        self.store.upsert_client(client)
    }

    pub fn delete_client(&self, id: &str) -> StoreResult<()> {
        self.store.delete_client(id)
    }

    // ========== Status ==========

    pub fn status(&self) -> ServiceStatus {
        let dispatcher = self.pipeline.dispatcher();
        ServiceStatus {
            devices: dispatcher.device_names(),
            ready_devices: dispatcher.ready_count(),
            current_day_key: self.sequencer.current_day_key(),
        }
    }
}
