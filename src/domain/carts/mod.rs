//! Carts

pub mod models;
pub mod store;
pub mod sync;

pub use models::{Cart, CartLine};
pub use store::CartStore;
pub use sync::CartSynchronizer;
