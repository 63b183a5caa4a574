//! # Views & Presenters
//!
//! ## Synchronization Protocol
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  mount()      render once, then subscribe to the change events of       │
//! │               exactly the state the view displays                       │
//! │                                                                         │
//! │  notification ──► refresh(): pull a fresh snapshot through the state    │
//! │                   holder's read accessors ──► View::render ──► Surface  │
//! │                                                                         │
//! │  user action  ──► Control intent ──► bus.publish (never a mutation)     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Views are pure: the same model always renders the same [`Element`], so a
//! redundant notification is harmless.

mod basket;
mod element;
mod forms;
mod gallery;
mod header;
mod modal;
mod preview;
mod success;

use std::sync::Arc;

use storefront_core::{EventBus, EventFilter, StoreEvent, SubscriptionId};

pub use basket::{BasketPresenter, BasketView};
pub use element::{Control, Element};
pub use forms::{ContactsFormPresenter, ContactsFormView, FormModel, OrderFormPresenter, OrderFormView};
pub use gallery::{GalleryModel, GalleryPresenter, GalleryView};
pub use header::{HeaderModel, HeaderPresenter, HeaderView};
pub use modal::{ModalPresenter, ModalView};
pub use preview::{PreviewModel, PreviewPresenter, PreviewView};
pub use success::{SuccessPresenter, SuccessView};

/// A pure renderer.
pub trait View {
    type Model;

    fn render(&self, model: &Self::Model) -> Element;
}

/// A bus subscriber that re-renders one view into the surface.
pub trait Presenter: Send + Sync + 'static {
    /// Events that make the presenter refresh.
    fn triggers(&self) -> EventFilter;

    /// Pulls fresh state and re-renders. `event` is `None` on mount.
    fn refresh(&self, event: Option<&StoreEvent>) -> anyhow::Result<()>;
}

/// Renders `presenter` once and subscribes it to its triggers.
///
/// The subscription holds a weak reference; the caller keeps the presenter
/// alive.
pub fn mount<P: Presenter>(presenter: &Arc<P>, bus: &EventBus) -> anyhow::Result<SubscriptionId> {
    presenter.refresh(None)?;
    let weak = Arc::downgrade(presenter);
    Ok(bus.subscribe(presenter.triggers(), move |event| match weak.upgrade() {
        Some(presenter) => presenter.refresh(Some(event)),
        None => Ok(()),
    }))
}
