//! Order submission pipeline
//!
//! One submission runs through: numbering, client resolution, kitchen
//! print, settle delay, customer print, persistence. The kitchen copy
//! goes out before anything is persisted so the cooks start even if the
//! database write later fails; the counter keeps the paper either way.

use crate::db::models::{NO_ALT_NUMBER, NO_CLIENT, OrderRequest, ResolvedOrder};
use crate::db::{Store, StoreError};
use crate::printing::{CopyKind, DispatchOutcome, PrintDispatcher, ReceiptRenderer};
use crate::utils::now_millis;
use comanda_printer::Printer;
use rust_decimal::Decimal;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info, instrument, warn};

use super::resolver::ClientResolver;
use super::sequencer::{OrderSequencer, SequencerError};

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("Order has no lines")]
    EmptyOrder,

    #[error("Delivery fee cannot be negative")]
    NegativeDeliveryFee,

    #[error("Numbering failed: {0}")]
    Numbering(#[from] SequencerError),

    #[error("Persistence failed: {0}")]
    Persistence(#[from] StoreError),
}

/// What happened to one submission
#[derive(Debug)]
pub struct SubmitReceipt {
    pub order_id: String,
    pub day_key: String,
    pub sequence: u32,
    pub kitchen: Vec<DispatchOutcome>,
    pub customer: Vec<DispatchOutcome>,
}

/// Runs an order from submission to paper and storage
pub struct OrderPipeline<P: Printer> {
    store: Store,
    sequencer: OrderSequencer,
    resolver: ClientResolver,
    renderer: ReceiptRenderer,
    dispatcher: PrintDispatcher<P>,
    settle_delay: Duration,
}

impl<P: Printer> OrderPipeline<P> {
    pub fn new(
        store: Store,
        sequencer: OrderSequencer,
        resolver: ClientResolver,
        renderer: ReceiptRenderer,
        dispatcher: PrintDispatcher<P>,
        settle_delay: Duration,
    ) -> Self {
        Self {
            store,
            sequencer,
            resolver,
            renderer,
            dispatcher,
            settle_delay,
        }
    }

    pub fn dispatcher(&self) -> &PrintDispatcher<P> {
        &self.dispatcher
    }

    /// Submit one order
    #[instrument(skip(self, request), fields(lines = request.lines.len()))]
    pub async fn submit(&self, request: OrderRequest) -> Result<SubmitReceipt, SubmitError> {
        if request.lines.is_empty() {
            return Err(SubmitError::EmptyOrder);
        }
        if request.delivery_fee < Decimal::ZERO {
            return Err(SubmitError::NegativeDeliveryFee);
        }

        let (day_key, sequence) = self.sequencer.next_number()?;

        // A broken client lookup must not hold up the order
        let client = match self.resolver.resolve(&request.client_id) {
            Ok(client) => client,
            Err(e) => {
                warn!(client_id = %request.client_id, error = %e, "Client lookup failed, printing without client");
                None
            }
        };

        // Snapshot the client at order time; display fields only count
        // when no client matched
        let order = ResolvedOrder {
            id: format!("{}@{}", day_key, sequence),
            day_key: day_key.clone(),
            sequence,
            created_at: now_millis(),
            total: request.total(),
            lines: request.lines,
            delivery_fee: request.delivery_fee,
            client: client
                .as_ref()
                .map(|c| c.id.clone())
                .unwrap_or_else(|| NO_CLIENT.to_string()),
            client_name: client
                .as_ref()
                .map(|c| c.name.clone())
                .or(request.display_name),
            client_address: client
                .as_ref()
                .map(|c| c.address.clone())
                .filter(|a| !a.is_empty()),
            alt_number: client
                .as_ref()
                .map(|c| c.alt_number.clone())
                .filter(|n| n != NO_ALT_NUMBER),
            display_number: request.display_number,
            estimated_minutes: request.estimated_minutes,
            notes: request.notes,
        };

        info!(order_id = %order.id, "Order numbered");

        let kitchen = self
            .dispatcher
            .dispatch(|_| self.renderer.render(&order, CopyKind::Kitchen))
            .await;

        // Let the first cut settle before the second copy
        tokio::time::sleep(self.settle_delay).await;

        let customer = self
            .dispatcher
            .dispatch(|_| self.renderer.render(&order, CopyKind::Customer))
            .await;

        if let Err(e) = self.store.insert_order(&order) {
            // Receipts are already on paper at this point
            error!(order_id = %order.id, error = %e, "Persistence failed after printing");
            return Err(e.into());
        }
        info!(order_id = %order.id, "Order persisted");

        Ok(SubmitReceipt {
            order_id: order.id,
            day_key,
            sequence,
            kitchen,
            customer,
        })
    }
}
