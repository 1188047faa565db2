//! Cart Synchronizer
//!
//! Reconciles in-memory carts with their durable records. Loading is
//! forgiving: a missing or corrupt record yields a fresh empty cart, so a
//! damaged storage file can never wedge the storefront. Writes replace
//! the owner's whole record; a failed write is logged and the in-memory
//! cart stays authoritative until a later write succeeds.

use std::sync::Arc;

use tracing::warn;

use crate::{domain::carts::models::Cart, session::OwnerKey, storage::KeyValueStore};

#[derive(Clone)]
pub struct CartSynchronizer {
    storage: Arc<dyn KeyValueStore>,
}

impl CartSynchronizer {
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    /// Load the durable cart for `owner`.
    ///
    /// The storage key, not the record, decides who a cart belongs to:
    /// a record whose embedded owner disagrees with the key it was filed
    /// under is realigned to the key.
    #[must_use]
    pub fn load(&self, owner: &OwnerKey) -> Cart {
        let key = owner.storage_key();

        let raw = match self.storage.get(&key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Cart::empty_for(owner.clone()),
            Err(error) => {
                warn!(%owner, "failed to read cart record: {error}");
                return Cart::empty_for(owner.clone());
            }
        };

        match serde_json::from_str::<Cart>(&raw) {
            Ok(mut cart) => {
                cart.owner = owner.clone();
                cart
            }
            Err(error) => {
                warn!(%owner, "discarding corrupt cart record: {error}");
                Cart::empty_for(owner.clone())
            }
        }
    }

    /// Write the full record for the cart's owner.
    pub fn persist(&self, cart: &Cart) {
        let record = match serde_json::to_string(cart) {
            Ok(record) => record,
            Err(error) => {
                warn!(owner = %cart.owner, "failed to encode cart record: {error}");
                return;
            }
        };

        if let Err(error) = self.storage.set(&cart.owner.storage_key(), &record) {
            warn!(owner = %cart.owner, "failed to persist cart record: {error}");
        }
    }

    /// Delete the durable record for `owner`, leaving other owners' carts
    /// untouched.
    pub fn discard(&self, owner: &OwnerKey) {
        if let Err(error) = self.storage.remove(&owner.storage_key()) {
            warn!(%owner, "failed to discard cart record: {error}");
        }
    }
}
