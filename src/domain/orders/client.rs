//! HTTP client for the remote order service.

use async_trait::async_trait;
use mockall::automock;
use reqwest::{Client, StatusCode, header::AUTHORIZATION};
use serde::Deserialize;
use thiserror::Error;

use crate::domain::orders::models::{OrderRequest, PlacedOrder};

/// Configuration for reaching the order service.
#[derive(Debug, Clone)]
pub struct OrderApiConfig {
    /// Service base URL, e.g. `https://shop.example.com/api`.
    pub base_url: String,
}

/// Remote order placement and history retrieval.
#[automock]
#[async_trait]
pub trait OrderGateway: Send + Sync {
    /// Submit an order for placement.
    async fn place_order(
        &self,
        token: &str,
        request: &OrderRequest,
    ) -> Result<PlacedOrder, OrderGatewayError>;

    /// Fetch the authenticated user's prior orders, newest first.
    async fn fetch_orders(&self, token: &str) -> Result<Vec<PlacedOrder>, OrderGatewayError>;
}

/// Errors that can occur when calling the order service.
#[derive(Debug, Error)]
pub enum OrderGatewayError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("credentials rejected by the order service")]
    Unauthorized,

    #[error("{0}")]
    Rejected(String),
}

/// HTTP implementation of [`OrderGateway`].
#[derive(Debug, Clone)]
pub struct HttpOrderGateway {
    config: OrderApiConfig,
    http: Client,
}

impl HttpOrderGateway {
    #[must_use]
    pub fn new(config: OrderApiConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }
}

#[async_trait]
impl OrderGateway for HttpOrderGateway {
    async fn place_order(
        &self,
        token: &str,
        request: &OrderRequest,
    ) -> Result<PlacedOrder, OrderGatewayError> {
        let url = format!("{}/orders", self.config.base_url);

        let response = self
            .http
            .post(&url)
            .header(AUTHORIZATION, bearer_value(token))
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(rejection(response).await);
        }

        let parsed: PlaceOrderResponse = response.json().await?;

        Ok(parsed.order)
    }

    async fn fetch_orders(&self, token: &str) -> Result<Vec<PlacedOrder>, OrderGatewayError> {
        let url = format!("{}/user/orders", self.config.base_url);

        let response = self
            .http
            .get(&url)
            .header(AUTHORIZATION, bearer_value(token))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(rejection(response).await);
        }

        let parsed: OrdersResponse = response.json().await?;

        Ok(parsed.orders)
    }
}

/// Build the `Authorization` header value. Tokens that already carry the
/// scheme are passed through rather than double-prefixed.
fn bearer_value(token: &str) -> String {
    if token.starts_with("Bearer ") {
        token.to_string()
    } else {
        format!("Bearer {token}")
    }
}

/// Map a non-2xx response to a gateway error, preferring the service's
/// own message when the body carries one.
async fn rejection(response: reqwest::Response) -> OrderGatewayError {
    let status = response.status();

    if status == StatusCode::UNAUTHORIZED {
        return OrderGatewayError::Unauthorized;
    }

    let body = response.text().await.unwrap_or_default();

    OrderGatewayError::Rejected(rejection_message(status, &body))
}

fn rejection_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .map(|parsed| parsed.message)
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| format!("order request failed with status {status}"))
}

#[derive(Debug, Deserialize)]
struct PlaceOrderResponse {
    order: PlacedOrder,
}

#[derive(Debug, Deserialize)]
struct OrdersResponse {
    orders: Vec<PlacedOrder>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    message: String,
}
