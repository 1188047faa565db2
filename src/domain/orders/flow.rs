//! Order Submission Flow
//!
//! Drives order placement on top of the cart store: one attempt in
//! flight at a time, preconditions checked before any network traffic,
//! and the cart cleared only once the service acknowledges the order.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::info;

use crate::{
    domain::{
        carts::store::CartStore,
        orders::{
            client::{OrderGateway, OrderGatewayError},
            errors::OrderFlowError,
            models::{CheckoutForm, OrderRequest, Payment, PlacedOrder, SubmissionState},
        },
    },
    notify::{NoticeKind, Notifier},
    session::{AuthToken, SessionSource},
};

pub struct OrderFlow {
    gateway: Arc<dyn OrderGateway>,
    cart: Arc<CartStore>,
    session: Arc<dyn SessionSource>,
    notifier: Arc<dyn Notifier>,
    state: Mutex<SubmissionState>,
}

impl OrderFlow {
    #[must_use]
    pub fn new(
        gateway: Arc<dyn OrderGateway>,
        cart: Arc<CartStore>,
        session: Arc<dyn SessionSource>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            gateway,
            cart,
            session,
            notifier,
            state: Mutex::new(SubmissionState::Idle),
        }
    }

    /// Current submission lifecycle state.
    #[must_use]
    pub fn state(&self) -> SubmissionState {
        self.lock_state().clone()
    }

    /// Return a terminal attempt to [`SubmissionState::Idle`]. Does
    /// nothing while a submission is in flight.
    pub fn reset(&self) {
        let mut state = self.lock_state();

        if *state != SubmissionState::Submitting {
            *state = SubmissionState::Idle;
        }
    }

    /// Validate the checkout form and submit the current cart as an order.
    ///
    /// The cart is frozen into the request before the call leaves, and is
    /// cleared only when the service acknowledges the order. Validation
    /// failures leave the submission state untouched; a fresh attempt
    /// from a terminal state implicitly acknowledges the prior outcome.
    ///
    /// # Errors
    ///
    /// Returns an error when unauthenticated, when a precondition fails,
    /// when another submission is in flight, or when the service rejects
    /// or never receives the request. An expired session is cleared
    /// before the error is returned.
    #[tracing::instrument(name = "orders.submit", skip_all, fields(payment_method = %form.payment.method()))]
    pub async fn submit(&self, form: &CheckoutForm) -> Result<PlacedOrder, OrderFlowError> {
        let (token, request) = self.begin(form)?;

        let result = self.gateway.place_order(token.as_str(), &request).await;
        drop(token);

        match result {
            Ok(order) => {
                self.cart.clear();
                *self.lock_state() = SubmissionState::Succeeded(order.id.clone());
                self.notifier
                    .notify(NoticeKind::Success, "Order placed successfully!");
                info!(order_ref = %order.id, "order placed");

                Ok(order)
            }
            Err(error) => Err(self.fail(error)),
        }
    }

    /// Fetch the authenticated user's prior orders.
    ///
    /// # Errors
    ///
    /// Returns an error when unauthenticated or when the service cannot
    /// be reached. An expired session is cleared before the error is
    /// returned.
    pub async fn history(&self) -> Result<Vec<PlacedOrder>, OrderFlowError> {
        let Some(token) = self.session.token() else {
            self.notifier
                .notify(NoticeKind::Error, "Please log in to view your orders.");
            return Err(OrderFlowError::Unauthenticated);
        };

        match self.gateway.fetch_orders(token.as_str()).await {
            Ok(orders) => Ok(orders),
            Err(OrderGatewayError::Unauthorized) => Err(self.expire_session()),
            Err(OrderGatewayError::Rejected(reason)) => {
                self.notifier.notify(NoticeKind::Error, &reason);
                Err(OrderFlowError::Rejected(reason))
            }
            Err(OrderGatewayError::Http(source)) => {
                self.notifier
                    .notify(NoticeKind::Error, "Failed to load orders.");
                Err(OrderFlowError::Network(source))
            }
        }
    }

    /// Run the precondition gate and claim the submission slot.
    ///
    /// Checks run against a snapshot taken here; the returned request is
    /// immune to cart mutations made while the call is in flight.
    fn begin(&self, form: &CheckoutForm) -> Result<(AuthToken, OrderRequest), OrderFlowError> {
        // A token without a user id is a half-written session; orders are
        // placed against a user, so both must be present.
        let (Some(token), Some(_)) = (self.session.token(), self.session.user_id()) else {
            self.notifier
                .notify(NoticeKind::Error, "Please log in to place an order.");
            return Err(OrderFlowError::Unauthenticated);
        };

        let cart = self.cart.snapshot();
        if cart.is_empty() {
            return Err(self.validation("Your cart is empty!"));
        }

        if form.delivery_address.trim().is_empty() {
            return Err(self.validation("Please enter a delivery address!"));
        }

        match &form.payment {
            Payment::Upi { upi_id } if upi_id.trim().is_empty() => {
                return Err(self.validation("Please enter your UPI ID!"));
            }
            Payment::Card {
                card_number,
                cardholder,
            } if card_number.trim().is_empty() || cardholder.trim().is_empty() => {
                return Err(self.validation("Please enter your card details!"));
            }
            _ => {}
        }

        let request = OrderRequest::build(&cart, form);

        let mut state = self.lock_state();
        if *state == SubmissionState::Submitting {
            self.notifier
                .notify(NoticeKind::Error, "An order is already being placed.");
            return Err(OrderFlowError::AlreadyInProgress);
        }

        // Claiming the slot implicitly acknowledges any terminal outcome.
        *state = SubmissionState::Submitting;

        Ok((token, request))
    }

    fn validation(&self, message: &str) -> OrderFlowError {
        self.notifier.notify(NoticeKind::Error, message);

        OrderFlowError::Validation(message.to_string())
    }

    fn fail(&self, error: OrderGatewayError) -> OrderFlowError {
        match error {
            OrderGatewayError::Unauthorized => {
                *self.lock_state() =
                    SubmissionState::Failed("Session expired. Please log in again.".to_string());

                self.expire_session()
            }
            OrderGatewayError::Rejected(reason) => {
                *self.lock_state() = SubmissionState::Failed(reason.clone());
                self.notifier.notify(NoticeKind::Error, &reason);

                OrderFlowError::Rejected(reason)
            }
            OrderGatewayError::Http(source) => {
                *self.lock_state() = SubmissionState::Failed("Network error".to_string());
                self.notifier.notify(NoticeKind::Error, "Network error");

                OrderFlowError::Network(source)
            }
        }
    }

    fn expire_session(&self) -> OrderFlowError {
        self.session.clear();
        self.notifier
            .notify(NoticeKind::Error, "Session expired. Please log in again.");

        OrderFlowError::SessionExpired
    }

    fn lock_state(&self) -> MutexGuard<'_, SubmissionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
