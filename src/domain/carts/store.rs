//! Persistent Cart Store
//!
//! Holds the in-memory cart for whichever identity is currently active
//! and mirrors it to durable storage after every mutation. Identity is
//! re-resolved on each operation, so a login or logout between calls
//! swaps in the new owner's cart without any explicit hand-off.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::{
    domain::{
        carts::{
            models::{AddOutcome, Cart, RemoveOutcome},
            sync::CartSynchronizer,
        },
        products::{Product, ProductId},
    },
    notify::{NoticeKind, Notifier},
    session::{OwnerKey, SessionSource},
    storage::KeyValueStore,
};

pub struct CartStore {
    session: Arc<dyn SessionSource>,
    notifier: Arc<dyn Notifier>,
    sync: CartSynchronizer,
    current: Mutex<Cart>,
}

impl CartStore {
    /// Build a store over the given collaborators, loading the cart for
    /// whichever owner the session currently resolves to.
    #[must_use]
    pub fn new(
        session: Arc<dyn SessionSource>,
        storage: Arc<dyn KeyValueStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let sync = CartSynchronizer::new(storage);
        let owner = OwnerKey::resolve(session.as_ref());
        let cart = sync.load(&owner);

        Self {
            session,
            notifier,
            sync,
            current: Mutex::new(cart),
        }
    }

    /// Copy of the current owner's cart. Never mutates or persists.
    #[must_use]
    pub fn snapshot(&self) -> Cart {
        let mut current = self.lock_current();
        self.refresh_owner(&mut current);

        current.clone()
    }

    /// Add one unit of `product` to the current owner's cart and persist
    /// the result.
    pub fn add_item(&self, product: &Product) -> Cart {
        let mut current = self.lock_current();
        self.refresh_owner(&mut current);

        let outcome = current.add(product);
        self.sync.persist(&current);
        let cart = current.clone();
        drop(current);

        let message = match outcome {
            AddOutcome::Added => format!("{} added to cart", product.title),
            AddOutcome::QuantityIncreased => format!("Increased quantity of {}", product.title),
        };
        self.notifier.notify(NoticeKind::Success, &message);

        cart
    }

    /// Remove one unit of the product with `product_id`, dropping its line
    /// at quantity zero. Removing a product that is not in the cart is a
    /// silent no-op.
    pub fn remove_item(&self, product_id: &ProductId) -> Cart {
        let mut current = self.lock_current();
        self.refresh_owner(&mut current);

        let outcome = current.remove(product_id);
        if outcome != RemoveOutcome::NotPresent {
            self.sync.persist(&current);
        }
        let cart = current.clone();
        drop(current);

        match outcome {
            RemoveOutcome::QuantityDecreased { title } => {
                self.notifier
                    .notify(NoticeKind::Error, &format!("Removed one {title}"));
            }
            RemoveOutcome::LineRemoved { title } => {
                self.notifier
                    .notify(NoticeKind::Error, &format!("{title} removed from cart"));
            }
            RemoveOutcome::NotPresent => {}
        }

        cart
    }

    /// Empty the current owner's cart, persisting the empty record.
    pub fn clear(&self) -> Cart {
        let mut current = self.lock_current();
        self.refresh_owner(&mut current);

        let owner = current.owner.clone();
        *current = Cart::empty_for(owner);
        self.sync.persist(&current);
        let cart = current.clone();
        drop(current);

        self.notifier.notify(NoticeKind::Error, "Cart cleared");

        cart
    }

    /// Empty the current owner's cart and delete its durable record.
    /// Other owners' records are left untouched; this is the logout path.
    pub fn discard(&self) {
        let mut current = self.lock_current();
        self.refresh_owner(&mut current);

        let owner = current.owner.clone();
        self.sync.discard(&owner);
        *current = Cart::empty_for(owner);
    }

    fn lock_current(&self) -> MutexGuard<'_, Cart> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Swap in the owner's durable cart when ambient identity has changed
    /// since the last operation. Carts are swapped, never merged.
    fn refresh_owner(&self, current: &mut Cart) {
        let owner = OwnerKey::resolve(self.session.as_ref());

        if current.owner != owner {
            *current = self.sync.load(&owner);
        }
    }
}
