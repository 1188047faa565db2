//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    config::ClientConfig,
    domain::{
        carts::store::CartStore,
        orders::{
            client::{HttpOrderGateway, OrderApiConfig, OrderGateway},
            flow::OrderFlow,
        },
    },
    notify::{Notifier, TracingNotifier},
    session::{SessionSource, StoredSession},
    storage::{JsonFileStore, KeyValueStore, StorageError},
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to open durable storage")]
    Storage(#[source] StorageError),
}

/// Wired application services.
#[derive(Clone)]
pub struct AppContext {
    pub session: Arc<StoredSession>,
    pub cart: Arc<CartStore>,
    pub orders: Arc<OrderFlow>,
    pub notifier: Arc<dyn Notifier>,
}

impl AppContext {
    /// Build the application context from client configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when durable storage cannot be opened.
    pub fn from_config(config: &ClientConfig) -> Result<Self, AppInitError> {
        let storage: Arc<dyn KeyValueStore> =
            Arc::new(JsonFileStore::open(&config.storage_path).map_err(AppInitError::Storage)?);

        let session = Arc::new(StoredSession::new(Arc::clone(&storage)));
        let session_source: Arc<dyn SessionSource> = Arc::clone(&session) as Arc<dyn SessionSource>;
        let notifier: Arc<dyn Notifier> = Arc::new(TracingNotifier);

        let cart = Arc::new(CartStore::new(
            Arc::clone(&session_source),
            storage,
            Arc::clone(&notifier),
        ));

        let gateway: Arc<dyn OrderGateway> = Arc::new(HttpOrderGateway::new(OrderApiConfig {
            base_url: config.api_base_url.clone(),
        }));

        let orders = Arc::new(OrderFlow::new(
            gateway,
            Arc::clone(&cart),
            session_source,
            Arc::clone(&notifier),
        ));

        Ok(Self {
            session,
            cart,
            orders,
            notifier,
        })
    }
}
