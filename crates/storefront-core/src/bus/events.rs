//! Event type definitions for the event bus.
//!
//! Every event is one variant of [`StoreEvent`]. Intents are published by
//! presentation when the user acts; notifications are published by state
//! holders after they mutate.

use serde::Serialize;

use crate::buyer::BuyerProfile;
use crate::types::{BuyerField, OrderConfirmation, Product, ProductId};

/// Root event enum for all storefront events
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "payload")]
pub enum StoreEvent {
    /// The catalog was replaced (carries the new list).
    CatalogChanged(Vec<Product>),
    /// Loading the catalog failed; the catalog was left untouched.
    CatalogFetchFailed {
        /// User-facing message.
        message: String,
    },
    /// User opened a product card.
    ProductSelected(Product),
    /// The previewed product changed.
    PreviewChanged(Option<Product>),
    /// User pressed the buy/remove button on the preview.
    PreviewToggle,
    /// User pressed "remove" on a basket line.
    CartRemoveRequested(ProductId),
    /// Cart membership may have changed.
    CartChanged,
    /// User opened the basket.
    BasketOpened,
    /// User moved from the basket to the payment/address step.
    OrderFormOpened,
    /// User moved from the payment/address step to the contacts step.
    ContactsFormOpened,
    /// User edited one checkout field.
    BuyerFieldEdited {
        /// Field being edited.
        field: BuyerField,
        /// Raw input as typed.
        value: String,
    },
    /// The buyer profile changed (carries the whole snapshot).
    ProfileChanged(BuyerProfile),
    /// The buyer profile was reset for the next order.
    ProfileCleared,
    /// User pressed "pay".
    OrderSubmitRequested,
    /// An order submission started or finished.
    SubmissionStateChanged {
        /// Whether a submission is outstanding.
        in_flight: bool,
    },
    /// The order service accepted the order.
    OrderPlaced(OrderConfirmation),
    /// The order could not be placed; nothing was mutated.
    OrderFailed {
        /// User-facing, retry-prompting message.
        message: String,
    },
    /// User dismissed the success screen.
    OrderDone,
    /// User closed the modal.
    ModalClosed,
}

impl StoreEvent {
    /// Returns the kind of this event
    pub fn kind(&self) -> EventKind {
        match self {
            StoreEvent::CatalogChanged(_) => EventKind::CatalogChanged,
            StoreEvent::CatalogFetchFailed { .. } => EventKind::CatalogFetchFailed,
            StoreEvent::ProductSelected(_) => EventKind::ProductSelected,
            StoreEvent::PreviewChanged(_) => EventKind::PreviewChanged,
            StoreEvent::PreviewToggle => EventKind::PreviewToggle,
            StoreEvent::CartRemoveRequested(_) => EventKind::CartRemoveRequested,
            StoreEvent::CartChanged => EventKind::CartChanged,
            StoreEvent::BasketOpened => EventKind::BasketOpened,
            StoreEvent::OrderFormOpened => EventKind::OrderFormOpened,
            StoreEvent::ContactsFormOpened => EventKind::ContactsFormOpened,
            StoreEvent::BuyerFieldEdited { .. } => EventKind::BuyerFieldEdited,
            StoreEvent::ProfileChanged(_) => EventKind::ProfileChanged,
            StoreEvent::ProfileCleared => EventKind::ProfileCleared,
            StoreEvent::OrderSubmitRequested => EventKind::OrderSubmitRequested,
            StoreEvent::SubmissionStateChanged { .. } => EventKind::SubmissionStateChanged,
            StoreEvent::OrderPlaced(_) => EventKind::OrderPlaced,
            StoreEvent::OrderFailed { .. } => EventKind::OrderFailed,
            StoreEvent::OrderDone => EventKind::OrderDone,
            StoreEvent::ModalClosed => EventKind::ModalClosed,
        }
    }

    /// Returns the event name (`"cart:changed"`, ...).
    pub fn name(&self) -> &'static str {
        self.kind().name()
    }

    /// Get a short description of this event for logging
    pub fn description(&self) -> String {
        match self {
            StoreEvent::CatalogChanged(products) => {
                format!("Catalog replaced with {} products", products.len())
            }
            StoreEvent::CatalogFetchFailed { message } => format!("Catalog fetch failed: {}", message),
            StoreEvent::ProductSelected(product) => format!("Selected product {}", product.id),
            StoreEvent::PreviewChanged(Some(product)) => format!("Previewing {}", product.id),
            StoreEvent::PreviewChanged(None) => "Preview cleared".to_string(),
            StoreEvent::CartRemoveRequested(id) => format!("Remove {} from cart", id),
            StoreEvent::BuyerFieldEdited { field, .. } => format!("Edited {}", field),
            StoreEvent::SubmissionStateChanged { in_flight } => {
                format!("Submission in flight: {}", in_flight)
            }
            StoreEvent::OrderPlaced(confirmation) => format!("Order {} placed", confirmation.id),
            StoreEvent::OrderFailed { message } => format!("Order failed: {}", message),
            other => other.name().to_string(),
        }
    }
}

/// Discriminant of [`StoreEvent`], used for typed subscriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EventKind {
    CatalogChanged,
    CatalogFetchFailed,
    ProductSelected,
    PreviewChanged,
    PreviewToggle,
    CartRemoveRequested,
    CartChanged,
    BasketOpened,
    OrderFormOpened,
    ContactsFormOpened,
    BuyerFieldEdited,
    ProfileChanged,
    ProfileCleared,
    OrderSubmitRequested,
    SubmissionStateChanged,
    OrderPlaced,
    OrderFailed,
    OrderDone,
    ModalClosed,
}

impl EventKind {
    /// Stable event name, `namespace:action`.
    pub fn name(&self) -> &'static str {
        match self {
            EventKind::CatalogChanged => "catalog:changed",
            EventKind::CatalogFetchFailed => "catalog:failed",
            EventKind::ProductSelected => "product:select",
            EventKind::PreviewChanged => "preview:changed",
            EventKind::PreviewToggle => "preview:toggle",
            EventKind::CartRemoveRequested => "cart:remove",
            EventKind::CartChanged => "cart:changed",
            EventKind::BasketOpened => "basket:open",
            EventKind::OrderFormOpened => "order:open",
            EventKind::ContactsFormOpened => "contacts:open",
            EventKind::BuyerFieldEdited => "buyer:edit",
            EventKind::ProfileChanged => "buyer:changed",
            EventKind::ProfileCleared => "buyer:cleared",
            EventKind::OrderSubmitRequested => "order:submit",
            EventKind::SubmissionStateChanged => "order:pending",
            EventKind::OrderPlaced => "order:placed",
            EventKind::OrderFailed => "order:failed",
            EventKind::OrderDone => "order:done",
            EventKind::ModalClosed => "modal:close",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
