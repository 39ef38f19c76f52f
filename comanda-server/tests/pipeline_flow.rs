//! End-to-end pipeline flow: submission to paper and storage

use comanda_printer::{PrintError, PrintResult, Printer};
use comanda_server::db::Store;
use comanda_server::db::models::{Client, OrderLine, OrderRequest, PaidAddon, SizeVariant};
use comanda_server::orders::{ClientResolver, OrderPipeline, OrderSequencer, SubmitError};
use comanda_server::printing::{PrintDispatcher, ReceiptRenderer};
use rust_decimal::Decimal;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Printer double that records jobs and fails on demand
#[derive(Clone)]
struct MockPrinter {
    jobs: Arc<Mutex<Vec<Vec<u8>>>>,
    fail: Arc<Mutex<bool>>,
}

impl MockPrinter {
    fn new() -> Self {
        Self {
            jobs: Arc::new(Mutex::new(Vec::new())),
            fail: Arc::new(Mutex::new(false)),
        }
    }

    fn set_fail(&self, fail: bool) {
        *self.fail.lock().unwrap() = fail;
    }

    fn job_count(&self) -> usize {
        self.jobs.lock().unwrap().len()
    }
}

impl Printer for MockPrinter {
    async fn print(&self, data: &[u8]) -> PrintResult<()> {
        if *self.fail.lock().unwrap() {
            return Err(PrintError::Connection("mock failure".to_string()));
        }
        self.jobs.lock().unwrap().push(data.to_vec());
        Ok(())
    }

    async fn is_online(&self) -> bool {
        !*self.fail.lock().unwrap()
    }
}

struct Fixture {
    store: Store,
    pipeline: OrderPipeline<MockPrinter>,
    kitchen: MockPrinter,
    counter: MockPrinter,
    _dir: tempfile::TempDir,
}

fn fixture() -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let store = Store::open(dir.path().join("comanda.redb")).unwrap();

    let kitchen = MockPrinter::new();
    let counter = MockPrinter::new();
    let dispatcher = PrintDispatcher::from_handles(
        vec![
            ("kitchen".to_string(), kitchen.clone()),
            ("counter".to_string(), counter.clone()),
        ],
        Duration::from_secs(1),
    );

    let pipeline = OrderPipeline::new(
        store.clone(),
        OrderSequencer::new(store.clone(), 8),
        ClientResolver::new(store.clone()),
        ReceiptRenderer::new("Kebab Pacifico"),
        dispatcher,
        Duration::from_millis(10),
    );

    Fixture {
        store,
        pipeline,
        kitchen,
        counter,
        _dir: dir,
    }
}

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn sample_request() -> OrderRequest {
    OrderRequest {
        lines: vec![
            OrderLine {
                item_name: "Durum mixto".to_string(),
                size: SizeVariant::Large,
                price: dec("7.50"),
                quantity: 2,
                free_addons: vec!["Ensalada".to_string()],
                paid_addons: vec![PaidAddon {
                    name: "Queso".to_string(),
                    price: dec("1.00"),
                }],
            },
            OrderLine {
                item_name: "Lahmacun".to_string(),
                size: SizeVariant::Normal,
                price: dec("4.00"),
                quantity: 1,
                free_addons: vec![],
                paid_addons: vec![],
            },
        ],
        client_id: "600999888".to_string(),
        delivery_fee: dec("2.00"),
        estimated_minutes: 25,
        display_number: Some("600999888".to_string()),
        display_name: None,
        notes: Some("sin cebolla".to_string()),
    }
}

#[tokio::test]
async fn submission_prints_both_copies_and_persists() {
    let fx = fixture();

    let receipt = fx.pipeline.submit(sample_request()).await.unwrap();

    assert_eq!(receipt.sequence, 1);
    assert_eq!(receipt.order_id, format!("{}@1", receipt.day_key));
    assert!(receipt.kitchen.iter().all(|o| o.result.is_ok()));
    assert!(receipt.customer.iter().all(|o| o.result.is_ok()));

    // Kitchen copy then customer copy, on both devices
    assert_eq!(fx.kitchen.job_count(), 2);
    assert_eq!(fx.counter.job_count(), 2);

    let stored = fx.store.get_order(&receipt.order_id).unwrap().unwrap();
    // 7.50 * 2 + 4.00, unit prices already include paid add-ons
    assert_eq!(stored.total, dec("19.00"));
    assert_eq!(stored.total_with_delivery(), dec("21.00"));
    assert_eq!(stored.notes.as_deref(), Some("sin cebolla"));
}

#[tokio::test]
async fn unmatched_number_falls_back_to_display_fields() {
    let fx = fixture();

    let request = OrderRequest {
        lines: vec![
            OrderLine {
                item_name: "Pizza margarita".to_string(),
                size: SizeVariant::Normal,
                price: dec("8.00"),
                quantity: 1,
                free_addons: vec!["Oregano".to_string()],
                paid_addons: vec![],
            },
            OrderLine {
                item_name: "Pizza barbacoa".to_string(),
                size: SizeVariant::Xl,
                price: dec("14.00"),
                quantity: 1,
                free_addons: vec![],
                paid_addons: vec![PaidAddon {
                    name: "Extra queso".to_string(),
                    price: dec("5.00"),
                }],
            },
        ],
        client_id: "null".to_string(),
        delivery_fee: dec("20.00"),
        estimated_minutes: 30,
        display_number: Some("0100".to_string()),
        display_name: None,
        notes: None,
    };

    let receipt = fx.pipeline.submit(request).await.unwrap();
    let stored = fx.store.get_order(&receipt.order_id).unwrap().unwrap();

    // No client matched: the sentinel stays and the typed number is kept
    assert_eq!(stored.client, "null");
    assert_eq!(stored.display_number.as_deref(), Some("0100"));
    assert_eq!(stored.total, dec("22.00"));
    assert_eq!(stored.total_with_delivery(), dec("42.00"));
    assert!(receipt.kitchen.iter().all(|o| o.result.is_ok()));
}

#[tokio::test]
async fn client_resolved_through_alias_before_printing() {
    let fx = fixture();
    fx.store
        .upsert_client(&Client {
            id: "600111222".to_string(),
            alt_number: "600999888".to_string(),
            name: "Maria".to_string(),
            address: "Calle Mayor 1".to_string(),
        })
        .unwrap();

    let receipt = fx.pipeline.submit(sample_request()).await.unwrap();
    let stored = fx.store.get_order(&receipt.order_id).unwrap().unwrap();

    // The order snapshots the client under its primary key
    assert_eq!(stored.client, "600111222");
    assert_eq!(stored.client_name.as_deref(), Some("Maria"));
    assert_eq!(stored.client_address.as_deref(), Some("Calle Mayor 1"));
}

#[tokio::test]
async fn broken_counter_printer_does_not_block_the_order() {
    let fx = fixture();
    fx.counter.set_fail(true);

    let receipt = fx.pipeline.submit(sample_request()).await.unwrap();

    // Kitchen got both copies, counter got none
    assert_eq!(fx.kitchen.job_count(), 2);
    assert_eq!(fx.counter.job_count(), 0);
    assert!(receipt.kitchen[0].result.is_ok());
    assert!(receipt.kitchen[1].result.is_err());

    // The order is still persisted
    assert!(fx.store.get_order(&receipt.order_id).unwrap().is_some());
}

#[tokio::test]
async fn recovered_printer_rejoins_on_next_order() {
    let fx = fixture();
    fx.counter.set_fail(true);
    fx.pipeline.submit(sample_request()).await.unwrap();
    assert_eq!(fx.counter.job_count(), 0);

    fx.counter.set_fail(false);
    fx.pipeline.submit(sample_request()).await.unwrap();
    // Re-probed and back in service
    assert_eq!(fx.counter.job_count(), 2);
}

#[tokio::test]
async fn empty_order_rejected_without_printing() {
    let fx = fixture();
    let request = OrderRequest {
        lines: vec![],
        ..sample_request()
    };

    let result = fx.pipeline.submit(request).await;
    assert!(matches!(result, Err(SubmitError::EmptyOrder)));
    assert_eq!(fx.kitchen.job_count(), 0);
}

#[tokio::test]
async fn negative_delivery_fee_rejected_before_printing() {
    let fx = fixture();
    let request = OrderRequest {
        delivery_fee: dec("-5.00"),
        ..sample_request()
    };

    let result = fx.pipeline.submit(request).await;
    assert!(matches!(result, Err(SubmitError::NegativeDeliveryFee)));
    assert_eq!(fx.kitchen.job_count(), 0);
    assert_eq!(fx.counter.job_count(), 0);

    // The rejection happens before numbering, so no sequence is burnt
    let receipt = fx.pipeline.submit(sample_request()).await.unwrap();
    assert_eq!(receipt.sequence, 1);
}

#[tokio::test]
async fn orders_number_sequentially_within_a_day() {
    let fx = fixture();
    let first = fx.pipeline.submit(sample_request()).await.unwrap();
    let second = fx.pipeline.submit(sample_request()).await.unwrap();

    assert_eq!(first.sequence, 1);
    assert_eq!(second.sequence, 2);
    assert_eq!(first.day_key, second.day_key);

    let day = fx.store.orders_for_day(&first.day_key).unwrap();
    assert_eq!(day.len(), 2);
}
