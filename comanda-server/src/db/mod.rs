//! redb-based storage for orders, day counters and clients
//!
//! Single embedded database file. Write transactions are serialized by
//! redb, which is what makes [`Store::next_sequence`] safe under
//! concurrent submissions.

pub mod models;

use models::{Client, ResolvedOrder};
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Orders table: key = order_id ("day_key@sequence"), value = JSON
const ORDERS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("orders");

/// Index: (day_key, sequence) -> order_id
const ORDERS_BY_DAY_TABLE: TableDefinition<(&str, u32), &str> =
    TableDefinition::new("orders_by_day");

/// Per-day order counters: day_key -> last issued sequence
const DAY_COUNTERS_TABLE: TableDefinition<&str, u32> = TableDefinition::new("day_counters");

/// Clients table: key = primary phone number, value = JSON
const CLIENTS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("clients");

/// Index: (alt_number, client_id) -> ()
const CLIENTS_BY_ALT_TABLE: TableDefinition<(&str, &str), ()> =
    TableDefinition::new("clients_by_alt");

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Client not found: {0}")]
    ClientNotFound(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Order and client storage
#[derive(Clone)]
pub struct Store {
    db: Arc<Database>,
}

impl Store {
    /// Open or create database
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let db = Database::create(path)?;
        Self::init_tables(db)
    }

    /// Open in-memory database (for testing)
    #[cfg(test)]
    pub fn open_in_memory() -> StoreResult<Self> {
        let db =
            Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init_tables(db)
    }

    fn init_tables(db: Database) -> StoreResult<Self> {
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(ORDERS_TABLE)?;
            let _ = write_txn.open_table(ORDERS_BY_DAY_TABLE)?;
            let _ = write_txn.open_table(DAY_COUNTERS_TABLE)?;
            let _ = write_txn.open_table(CLIENTS_TABLE)?;
            let _ = write_txn.open_table(CLIENTS_BY_ALT_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    // ========== Sequencing ==========

    /// Issue the next order number for a day
    ///
    /// Read-increment-commit inside one write transaction, so two
    /// concurrent submissions can never get the same number. If the
    /// counter is missing (database replaced mid-day), it is reseeded
    /// from the highest persisted sequence of that day.
    pub fn next_sequence(&self, day_key: &str) -> StoreResult<u32> {
        let write_txn = self.db.begin_write()?;
        let next = {
            let mut counters = write_txn.open_table(DAY_COUNTERS_TABLE)?;
            let current = match counters.get(day_key)? {
                Some(guard) => guard.value(),
                None => {
                    let idx = write_txn.open_table(ORDERS_BY_DAY_TABLE)?;
                    let range_start: (&str, u32) = (day_key, 0);
                    let range_end: (&str, u32) = (day_key, u32::MAX);
                    match idx.range(range_start..=range_end)?.next_back() {
                        Some(entry) => {
                            let (key, _) = entry?;
                            key.value().1
                        }
                        None => 0,
                    }
                }
            };
            let next = current + 1;
            counters.insert(day_key, next)?;
            next
        };
        write_txn.commit()?;
        Ok(next)
    }

    // ========== Orders ==========

    /// Persist a resolved order
    pub fn insert_order(&self, order: &ResolvedOrder) -> StoreResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(ORDERS_TABLE)?;
            let value = serde_json::to_vec(order)?;
            table.insert(order.id.as_str(), value.as_slice())?;

            let mut idx = write_txn.open_table(ORDERS_BY_DAY_TABLE)?;
            idx.insert((order.day_key.as_str(), order.sequence), order.id.as_str())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Get an order by id
    pub fn get_order(&self, id: &str) -> StoreResult<Option<ResolvedOrder>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDERS_TABLE)?;

        match table.get(id)? {
            Some(guard) => {
                let order: ResolvedOrder = serde_json::from_slice(guard.value())?;
                Ok(Some(order))
            }
            None => Ok(None),
        }
    }

    /// All orders of one day, in sequence order
    pub fn orders_for_day(&self, day_key: &str) -> StoreResult<Vec<ResolvedOrder>> {
        let read_txn = self.db.begin_read()?;
        let idx = read_txn.open_table(ORDERS_BY_DAY_TABLE)?;
        let data = read_txn.open_table(ORDERS_TABLE)?;

        let mut orders = Vec::new();
        let range_start: (&str, u32) = (day_key, 0);
        let range_end: (&str, u32) = (day_key, u32::MAX);

        for result in idx.range(range_start..=range_end)? {
            let (_, order_id) = result?;
            if let Some(guard) = data.get(order_id.value())? {
                let order: ResolvedOrder = serde_json::from_slice(guard.value())?;
                orders.push(order);
            }
        }

        Ok(orders)
    }

    // ========== Clients ==========

    /// Get a client by primary phone number
    pub fn get_client(&self, id: &str) -> StoreResult<Option<Client>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(CLIENTS_TABLE)?;

        match table.get(id)? {
            Some(guard) => {
                let client: Client = serde_json::from_slice(guard.value())?;
                Ok(Some(client))
            }
            None => Ok(None),
        }
    }

    /// Find a client by secondary phone number
    pub fn find_client_by_alt(&self, alt: &str) -> StoreResult<Option<Client>> {
        let read_txn = self.db.begin_read()?;
        let idx = read_txn.open_table(CLIENTS_BY_ALT_TABLE)?;
        let data = read_txn.open_table(CLIENTS_TABLE)?;

        let range_start: (&str, &str) = (alt, "");
        let range_end: (&str, &str) = (alt, "\u{ffff}");

        for result in idx.range(range_start..=range_end)? {
            let (key, _) = result?;
            let (_, client_id) = key.value();
            if let Some(guard) = data.get(client_id)? {
                let client: Client = serde_json::from_slice(guard.value())?;
                return Ok(Some(client));
            }
        }

        Ok(None)
    }

    /// Create or update a client, keeping the alias index consistent
    pub fn upsert_client(&self, client: &Client) -> StoreResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(CLIENTS_TABLE)?;
            let mut idx = write_txn.open_table(CLIENTS_BY_ALT_TABLE)?;

            // Drop stale alias entry if the secondary number changed
            let old: Option<Client> = match table.get(client.id.as_str())? {
                Some(guard) => Some(serde_json::from_slice(guard.value())?),
                None => None,
            };
            if let Some(old) = old
                && old.has_alt_number()
                && old.alt_number != client.alt_number
            {
                idx.remove((old.alt_number.as_str(), client.id.as_str()))?;
            }

            let value = serde_json::to_vec(client)?;
            table.insert(client.id.as_str(), value.as_slice())?;

            if client.has_alt_number() {
                idx.insert((client.alt_number.as_str(), client.id.as_str()), ())?;
            }
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Delete a client and its alias entry
    pub fn delete_client(&self, id: &str) -> StoreResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(CLIENTS_TABLE)?;
            let old: Option<Client> = match table.remove(id)? {
                Some(guard) => Some(serde_json::from_slice(guard.value())?),
                None => None,
            };
            let old = old.ok_or_else(|| StoreError::ClientNotFound(id.to_string()))?;

            if old.has_alt_number() {
                let mut idx = write_txn.open_table(CLIENTS_BY_ALT_TABLE)?;
                idx.remove((old.alt_number.as_str(), id))?;
            }
        }
        write_txn.commit()?;
        Ok(())
    }

    /// List all clients
    pub fn list_clients(&self) -> StoreResult<Vec<Client>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(CLIENTS_TABLE)?;

        let mut clients = Vec::new();
        for result in table.iter()? {
            let (_, value) = result?;
            let client: Client = serde_json::from_slice(value.value())?;
            clients.push(client);
        }
        Ok(clients)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::{NO_ALT_NUMBER, SizeVariant};
    use rust_decimal::Decimal;

    fn sample_order(day: &str, seq: u32) -> ResolvedOrder {
        ResolvedOrder {
            id: format!("{}@{}", day, seq),
            day_key: day.to_string(),
            sequence: seq,
            created_at: 1_700_000_000_000,
            lines: vec![models::OrderLine {
                item_name: "Durum".to_string(),
                size: SizeVariant::Normal,
                price: "6.50".parse().unwrap(),
                quantity: 1,
                free_addons: vec![],
                paid_addons: vec![],
            }],
            total: "6.50".parse().unwrap(),
            delivery_fee: Decimal::ZERO,
            client: models::NO_CLIENT.to_string(),
            client_name: None,
            client_address: None,
            alt_number: None,
            display_number: None,
            estimated_minutes: 20,
            notes: None,
        }
    }

    fn sample_client(id: &str, alt: &str) -> Client {
        Client {
            id: id.to_string(),
            alt_number: alt.to_string(),
            name: "Maria".to_string(),
            address: "Calle Mayor 1".to_string(),
        }
    }

    #[test]
    fn test_sequence_starts_at_one_and_increments() {
        let store = Store::open_in_memory().unwrap();
        assert_eq!(store.next_sequence("28-8-2026").unwrap(), 1);
        assert_eq!(store.next_sequence("28-8-2026").unwrap(), 2);
        assert_eq!(store.next_sequence("28-8-2026").unwrap(), 3);
    }

    #[test]
    fn test_sequence_independent_per_day() {
        let store = Store::open_in_memory().unwrap();
        assert_eq!(store.next_sequence("28-8-2026").unwrap(), 1);
        assert_eq!(store.next_sequence("29-8-2026").unwrap(), 1);
    }

    #[test]
    fn test_sequence_concurrent_numbers_distinct() {
        let store = Store::open_in_memory().unwrap();
        let mut handles = Vec::new();
        for _ in 0..8 {
            let store = store.clone();
            handles.push(std::thread::spawn(move || {
                (0..5)
                    .map(|_| store.next_sequence("1-1-2026").unwrap())
                    .collect::<Vec<_>>()
            }));
        }

        let mut all: Vec<u32> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        all.sort_unstable();
        let expected: Vec<u32> = (1..=40).collect();
        assert_eq!(all, expected);
    }

    #[test]
    fn test_sequence_reseeds_from_persisted_orders() {
        let store = Store::open_in_memory().unwrap();
        store.insert_order(&sample_order("28-8-2026", 12)).unwrap();
        // Counter table has no entry for the day, the index does
        assert_eq!(store.next_sequence("28-8-2026").unwrap(), 13);
    }

    #[test]
    fn test_order_roundtrip_and_day_listing() {
        let store = Store::open_in_memory().unwrap();
        store.insert_order(&sample_order("28-8-2026", 2)).unwrap();
        store.insert_order(&sample_order("28-8-2026", 1)).unwrap();
        store.insert_order(&sample_order("29-8-2026", 1)).unwrap();

        let found = store.get_order("28-8-2026@1").unwrap().unwrap();
        assert_eq!(found.sequence, 1);

        let day = store.orders_for_day("28-8-2026").unwrap();
        assert_eq!(day.len(), 2);
        assert_eq!(day[0].sequence, 1);
        assert_eq!(day[1].sequence, 2);
    }

    #[test]
    fn test_client_alias_lookup() {
        let store = Store::open_in_memory().unwrap();
        store.upsert_client(&sample_client("600111222", "600333444")).unwrap();

        let by_alt = store.find_client_by_alt("600333444").unwrap().unwrap();
        assert_eq!(by_alt.id, "600111222");
    }

    #[test]
    fn test_client_without_alt_not_indexed() {
        let store = Store::open_in_memory().unwrap();
        store.upsert_client(&sample_client("600111222", NO_ALT_NUMBER)).unwrap();
        assert!(store.find_client_by_alt(NO_ALT_NUMBER).unwrap().is_none());
    }

    #[test]
    fn test_client_alt_change_drops_stale_alias() {
        let store = Store::open_in_memory().unwrap();
        store.upsert_client(&sample_client("600111222", "600333444")).unwrap();
        store.upsert_client(&sample_client("600111222", "600555666")).unwrap();

        assert!(store.find_client_by_alt("600333444").unwrap().is_none());
        assert!(store.find_client_by_alt("600555666").unwrap().is_some());
    }

    #[test]
    fn test_delete_client_removes_alias() {
        let store = Store::open_in_memory().unwrap();
        store.upsert_client(&sample_client("600111222", "600333444")).unwrap();
        store.delete_client("600111222").unwrap();

        assert!(store.get_client("600111222").unwrap().is_none());
        assert!(store.find_client_by_alt("600333444").unwrap().is_none());
    }

    #[test]
    fn test_delete_missing_client_errors() {
        let store = Store::open_in_memory().unwrap();
        assert!(matches!(
            store.delete_client("999"),
            Err(StoreError::ClientNotFound(_))
        ));
    }
}
