//! Order flow errors.

use thiserror::Error;

/// Errors surfaced by order submission and history retrieval.
#[derive(Debug, Error)]
pub enum OrderFlowError {
    /// No authenticated session; the user must log in first.
    #[error("not authenticated")]
    Unauthenticated,

    /// Checkout input failed a precondition; no request was sent.
    #[error("{0}")]
    Validation(String),

    /// Another submission is already in flight.
    #[error("an order submission is already in progress")]
    AlreadyInProgress,

    /// The remote call never completed; the cart is intact and the
    /// submission can be retried.
    #[error("network error")]
    Network(#[source] reqwest::Error),

    /// The service refused the order and said why.
    #[error("{0}")]
    Rejected(String),

    /// The service rejected the credentials; the session has been
    /// cleared and the user must log in again.
    #[error("session expired")]
    SessionExpired,
}
