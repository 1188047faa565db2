//! Products

pub mod models;

pub use models::{PLACEHOLDER_IMAGE, Product, ProductError, ProductId, RawProduct};
