//! Orders

pub mod client;
pub mod errors;
pub mod flow;
pub mod models;

pub use client::{HttpOrderGateway, OrderApiConfig, OrderGateway, OrderGatewayError};
pub use errors::OrderFlowError;
pub use flow::OrderFlow;
