//! # HTTP Transport
//!
//! [`StoreTransport`] over the storefront JSON API.
//!
//! ## Endpoints
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  GET  {api}/product ──► { "total": n, "items": [Product] }              │
//! │       image "/x.svg" rewritten to "{cdn}/x.svg"                         │
//! │                                                                         │
//! │  POST {api}/order   ──► { "id": "...", "total": n }                     │
//! │       body: Order JSON                                                  │
//! │                                                                         │
//! │  Any non-2xx        ──► { "error": "message" } → ClientError::Api       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Retry Strategy (catalog only)
//! ```text
//! Attempt 1 ──fail──► wait initial_backoff ──► Attempt 2 ──fail──► wait 2x ...
//!                                         capped at max_backoff, up to max_retries
//! ```
//! Order submission is never retried.

use async_trait::async_trait;
use backoff::backoff::Backoff;
use backoff::ExponentialBackoff;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use storefront_core::{Order, OrderConfirmation, Product};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::transport::StoreTransport;

// =============================================================================
// Wire Types
// =============================================================================

/// Body of `GET /product`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogResponse {
    #[serde(default)]
    pub total: usize,
    pub items: Vec<Product>,
}

/// Body of any failed request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

// =============================================================================
// HTTP Transport
// =============================================================================

/// Storefront API client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    config: ClientConfig,
}

impl HttpTransport {
    /// Builds a transport from a validated configuration.
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        config.validate()?;
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ClientError::InvalidConfig(e.to_string()))?;
        Ok(HttpTransport { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Resolves an image reference against the CDN base.
    pub fn resolve_image(&self, image: &str) -> String {
        if image.is_empty() || image.starts_with("http://") || image.starts_with("https://") {
            return image.to_string();
        }
        if image.starts_with('/') {
            format!("{}{}", self.config.cdn_url(), image)
        } else {
            format!("{}/{}", self.config.cdn_url(), image)
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.api_url(), path)
    }

    fn create_backoff(&self) -> ExponentialBackoff {
        let mut backoff = ExponentialBackoff {
            initial_interval: self.config.retry.initial_backoff(),
            max_interval: self.config.retry.max_backoff(),
            multiplier: 2.0,
            max_elapsed_time: None,
            ..Default::default()
        };
        // Start from initial_interval rather than the crate default.
        backoff.reset();
        backoff
    }

    async fn fetch_catalog_once(&self) -> ClientResult<Vec<Product>> {
        let response = self
            .client
            .get(self.endpoint("product"))
            .send()
            .await
            .map_err(|e| self.map_request_error(e))?;

        let body: CatalogResponse = self.read_json(response).await?;
        if body.total != 0 && body.total != body.items.len() {
            debug!(total = body.total, received = body.items.len(), "Catalog total mismatch");
        }

        Ok(body
            .items
            .into_iter()
            .map(|mut product| {
                product.image = self.resolve_image(&product.image);
                product
            })
            .collect())
    }

    async fn read_json<T: DeserializeOwned>(&self, response: Response) -> ClientResult<T> {
        let status = response.status();
        if status.is_success() {
            return response
                .json::<T>()
                .await
                .map_err(|e| ClientError::ResponseParseFailed(e.to_string()));
        }

        let body = response.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<ErrorResponse>(&body) {
            Ok(err) => err.error,
            Err(_) if !body.trim().is_empty() => body,
            Err(_) => status.canonical_reason().unwrap_or("Unknown error").to_string(),
        };
        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }

    fn map_request_error(&self, err: reqwest::Error) -> ClientError {
        if err.is_timeout() {
            ClientError::Timeout(self.config.api.timeout_secs)
        } else if err.is_decode() {
            ClientError::ResponseParseFailed(err.to_string())
        } else {
            ClientError::RequestFailed(err.to_string())
        }
    }
}

#[async_trait]
impl StoreTransport for HttpTransport {
    async fn fetch_catalog(&self) -> ClientResult<Vec<Product>> {
        let mut backoff = self.create_backoff();
        let mut retry_count = 0u32;

        loop {
            match self.fetch_catalog_once().await {
                Ok(products) => {
                    info!(count = products.len(), "Catalog loaded");
                    return Ok(products);
                }
                Err(e) if e.is_retryable() && retry_count < self.config.retry.max_retries => {
                    retry_count += 1;
                    let Some(duration) = backoff.next_backoff() else {
                        return Err(e);
                    };
                    warn!(error = %e, attempt = retry_count, ?duration, "Catalog fetch failed, retrying");
                    tokio::time::sleep(duration).await;
                }
                Err(e) => {
                    warn!(error = %e, "Catalog fetch failed");
                    return Err(e);
                }
            }
        }
    }

    async fn submit_order(&self, order: &Order) -> ClientResult<OrderConfirmation> {
        debug!(items = order.items.len(), total = %order.total, "Submitting order");
        let response = self
            .client
            .post(self.endpoint("order"))
            .json(order)
            .send()
            .await
            .map_err(|e| self.map_request_error(e))?;

        let confirmation: OrderConfirmation = self.read_json(response).await?;
        info!(order_id = %confirmation.id, total = %confirmation.total, "Order accepted");
        Ok(confirmation)
    }
}
