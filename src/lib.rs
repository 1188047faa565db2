//! Satchel
//!
//! Satchel is the client-side cart and order engine for a storefront:
//! per-identity persistent carts, durable-storage synchronisation, and an
//! order submission flow against a remote order service.

pub mod cli;
pub mod config;
pub mod context;
pub mod domain;
pub mod notify;
pub mod prices;
pub mod session;
pub mod storage;

#[cfg(test)]
mod test;
