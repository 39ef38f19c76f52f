//! Client resolution for incoming orders
//!
//! The counter terminal sends whatever was typed in the phone field.
//! Resolution order: primary phone number first, then the secondary
//! number index. The reserved id "0" belongs to the shop itself and is
//! looked up as primary only, since "0" also marks "no secondary
//! number" on client records and must never match one by alias.

use crate::db::models::{Client, NO_CLIENT, SHOP_CLIENT_ID};
use crate::db::{Store, StoreResult};

/// Resolves a typed phone number to a client record
#[derive(Clone)]
pub struct ClientResolver {
    store: Store,
}

impl ClientResolver {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Resolve a client reference from an order
    ///
    /// Returns `None` for the "null" sentinel and for numbers that match
    /// no record.
    pub fn resolve(&self, client_id: &str) -> StoreResult<Option<Client>> {
        if client_id == NO_CLIENT || client_id.is_empty() {
            return Ok(None);
        }

        if client_id == SHOP_CLIENT_ID {
            return self.store.get_client(SHOP_CLIENT_ID);
        }

        if let Some(client) = self.store.get_client(client_id)? {
            return Ok(Some(client));
        }

        self.store.find_client_by_alt(client_id)
    }
}
