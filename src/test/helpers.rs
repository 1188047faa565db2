//! Hand-rolled fakes for the seams the domain is wired through.

use std::sync::{
    Mutex, PoisonError,
    atomic::{AtomicBool, AtomicUsize, Ordering},
};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::{
    domain::{
        orders::{
            client::{OrderGateway, OrderGatewayError},
            models::{CheckoutForm, OrderRef, OrderRequest, Payment, PlacedOrder},
        },
        products::{Product, ProductId},
    },
    notify::{NoticeKind, Notifier},
    prices::Price,
    session::{AuthToken, SessionSource},
    storage::{KeyValueStore, MemoryStore, StorageError},
};

pub(crate) fn product(id: &str, title: &str, minor: u64) -> Product {
    Product {
        id: ProductId::new(id),
        title: title.to_string(),
        price: Price::from_minor(minor),
        image: format!("/{id}.jpg"),
    }
}

pub(crate) fn cod_form() -> CheckoutForm {
    CheckoutForm {
        delivery_address: "12 Hill Road".to_string(),
        payment: Payment::CashOnDelivery,
    }
}

pub(crate) fn placed_order(id: &str, total_minor: u64) -> PlacedOrder {
    PlacedOrder {
        id: OrderRef::new(id),
        items: Vec::new(),
        total_amount: Price::from_minor(total_minor).to_decimal(),
        delivery_address: None,
        payment_method: None,
        status: Some("pending".to_string()),
        created_at: None,
    }
}

/// A real transport error, conjured from a URL that cannot parse.
pub(crate) fn transport_error() -> reqwest::Error {
    reqwest::Client::new()
        .get("http://")
        .build()
        .expect_err("an empty host must fail to parse")
}

/// Switchable in-memory session.
#[derive(Debug, Default)]
pub(crate) struct FakeSession {
    credentials: Mutex<Option<(String, String)>>,
}

impl FakeSession {
    pub(crate) fn guest() -> Self {
        Self::default()
    }

    pub(crate) fn logged_in(token: &str, user_id: &str) -> Self {
        let session = Self::default();
        session.log_in(token, user_id);

        session
    }

    pub(crate) fn log_in(&self, token: &str, user_id: &str) {
        let mut credentials = self
            .credentials
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *credentials = Some((token.to_string(), user_id.to_string()));
    }

    pub(crate) fn log_out(&self) {
        self.clear();
    }
}

impl SessionSource for FakeSession {
    fn token(&self) -> Option<AuthToken> {
        self.credentials
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|(token, _)| AuthToken::new(token.clone()))
    }

    fn user_id(&self) -> Option<String> {
        self.credentials
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|(_, user_id)| user_id.clone())
    }

    fn clear(&self) {
        let mut credentials = self
            .credentials
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *credentials = None;
    }
}

/// Notifier that records every notice for later assertion.
#[derive(Debug, Default)]
pub(crate) struct RecordingNotifier {
    notices: Mutex<Vec<(NoticeKind, String)>>,
}

impl RecordingNotifier {
    pub(crate) fn messages(&self) -> Vec<String> {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, message)| message.clone())
            .collect()
    }

    pub(crate) fn contains(&self, message: &str) -> bool {
        self.messages().iter().any(|notice| notice == message)
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, kind: NoticeKind, message: &str) {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((kind, message.to_string()));
    }
}

/// In-memory store whose writes can be made to fail on demand.
#[derive(Debug, Default)]
pub(crate) struct FlakyStore {
    inner: MemoryStore,
    failing: AtomicBool,
}

impl FlakyStore {
    pub(crate) fn fail_writes(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), StorageError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StorageError::Io(std::io::Error::other("flaky store")));
        }

        Ok(())
    }
}

impl KeyValueStore for FlakyStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.check()?;
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.check()?;
        self.inner.remove(key)
    }
}

/// Gateway that parks every placement until released, for exercising the
/// in-flight submission guard.
pub(crate) struct GatedGateway {
    release: Notify,
    calls: AtomicUsize,
    order: PlacedOrder,
}

impl GatedGateway {
    pub(crate) fn new(order: PlacedOrder) -> Self {
        Self {
            release: Notify::new(),
            calls: AtomicUsize::new(0),
            order,
        }
    }

    pub(crate) fn release(&self) {
        self.release.notify_one();
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OrderGateway for GatedGateway {
    async fn place_order(
        &self,
        _token: &str,
        _request: &OrderRequest,
    ) -> Result<PlacedOrder, OrderGatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.release.notified().await;

        Ok(self.order.clone())
    }

    async fn fetch_orders(&self, _token: &str) -> Result<Vec<PlacedOrder>, OrderGatewayError> {
        Ok(Vec::new())
    }
}
