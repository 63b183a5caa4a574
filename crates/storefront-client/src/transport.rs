//! The transport seam between the storefront and whatever serves it.

use async_trait::async_trait;
use storefront_core::{Order, OrderConfirmation, Product};

use crate::error::ClientResult;

/// Remote catalog and order service.
///
/// Implementations must be cheap to share; the app holds one behind an
/// `Arc` and calls it from spawned tasks.
#[async_trait]
pub trait StoreTransport: Send + Sync {
    /// Loads the full product list, in server order.
    ///
    /// Image references in the returned products are already absolute.
    async fn fetch_catalog(&self) -> ClientResult<Vec<Product>>;

    /// Submits an order. Called at most once per pay press.
    async fn submit_order(&self, order: &Order) -> ClientResult<OrderConfirmation>;
}
