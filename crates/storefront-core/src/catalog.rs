//! # Catalog State
//!
//! Holds the fetched product list and the product currently previewed.
//!
//! ## Mutation Paths
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Catalog State Operations                             │
//! │                                                                         │
//! │  Trigger                  Operation              Published              │
//! │  ───────                  ─────────              ─────────              │
//! │                                                                         │
//! │  Fetch complete ────────► set_products() ──────► catalog:changed        │
//! │                                              (+ preview:changed when    │
//! │                                               the selection dropped)    │
//! │                                                                         │
//! │  product:select ────────► set_selected() ──────► preview:changed        │
//! │                                                                         │
//! │  Anything else  ────────► get_* (read only)                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use parking_lot::RwLock;
use std::sync::Arc;
use tracing::debug;

use crate::bus::{EventBus, EventKind, StoreEvent, SubscriptionId};
use crate::types::{Product, ProductId};

#[derive(Debug, Default)]
struct Catalog {
    products: Vec<Product>,
    selected: Option<Product>,
}

/// Bus-attached catalog state holder.
#[derive(Debug)]
pub struct CatalogState {
    bus: Arc<EventBus>,
    catalog: RwLock<Catalog>,
}

impl CatalogState {
    pub fn new(bus: Arc<EventBus>) -> Self {
        CatalogState {
            bus,
            catalog: RwLock::new(Catalog::default()),
        }
    }

    /// Subscribes this holder to the intents it owns (`product:select`).
    pub fn connect(self: &Arc<Self>) -> Vec<SubscriptionId> {
        let weak = Arc::downgrade(self);
        let select = self.bus.subscribe(EventKind::ProductSelected, move |event| {
            if let (Some(catalog), StoreEvent::ProductSelected(product)) = (weak.upgrade(), event) {
                catalog.set_selected(product.clone());
            }
            Ok(())
        });
        vec![select]
    }

    /// Replaces the whole catalog, keeping server order.
    ///
    /// A selection whose product is no longer listed is dropped, and that
    /// drop is announced with `preview:changed(None)` after `catalog:changed`.
    pub fn set_products(&self, products: Vec<Product>) {
        let dropped_selection = {
            let mut catalog = self.catalog.write();
            let keep_selection = catalog
                .selected
                .as_ref()
                .is_some_and(|sel| products.iter().any(|p| p.id == sel.id));
            catalog.products = products.clone();
            !keep_selection && catalog.selected.take().is_some()
        };
        debug!(count = products.len(), dropped_selection, "Catalog replaced");
        self.bus.publish(StoreEvent::CatalogChanged(products));
        if dropped_selection {
            self.bus.publish(StoreEvent::PreviewChanged(None));
        }
    }

    /// Sets the previewed product.
    pub fn set_selected(&self, product: Product) {
        self.catalog.write().selected = Some(product.clone());
        self.bus.publish(StoreEvent::PreviewChanged(Some(product)));
    }

    /// Clears the preview.
    pub fn clear_selected(&self) {
        self.catalog.write().selected = None;
        self.bus.publish(StoreEvent::PreviewChanged(None));
    }

    pub fn get_selected(&self) -> Option<Product> {
        self.catalog.read().selected.clone()
    }

    pub fn get_products(&self) -> Vec<Product> {
        self.catalog.read().products.clone()
    }

    /// Looks up a product. Unknown ids yield `None`, never a panic.
    pub fn get_by_id(&self, id: &ProductId) -> Option<Product> {
        self.catalog
            .read()
            .products
            .iter()
            .find(|p| &p.id == id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.catalog.read().products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.catalog.read().products.is_empty()
    }
}
