//! # Storefront
//!
//! Builds the bus, the state holders, every presenter and checkout, and
//! wires them together once at startup.
//!
//! ## Wiring Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  1. EventBus                                                            │
//! │  2. CatalogState, CartState, BuyerState ──► connect()                   │
//! │     (state reacts to an intent before any view re-renders)              │
//! │  3. Checkout ──► connect()                                              │
//! │     (submission state is current before presenters read it)            │
//! │  4. Presenters ──► mount()                                              │
//! │     header, gallery, preview, basket, order form, contacts, success,    │
//! │     modal last (a screen is rendered before it is opened)               │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use storefront_client::StoreTransport;
use storefront_core::{BuyerField, BuyerState, CartState, CatalogState, EventBus, StoreEvent};
use tracing::{info, warn};

use crate::checkout::Checkout;
use crate::error::{AppError, ErrorCode};
use crate::state::ConfigState;
use crate::surface::Surface;
use crate::views::{
    mount, BasketPresenter, BasketView, ContactsFormPresenter, Control, GalleryPresenter,
    GalleryView, HeaderPresenter, HeaderView, ModalPresenter, OrderFormPresenter, Presenter,
    PreviewPresenter, PreviewView, SuccessPresenter, SuccessView,
};

pub struct Storefront {
    bus: Arc<EventBus>,
    catalog: Arc<CatalogState>,
    cart: Arc<CartState>,
    buyer: Arc<BuyerState>,
    checkout: Arc<Checkout>,
    surface: Arc<Surface>,
    transport: Arc<dyn StoreTransport>,
    config: ConfigState,
    /// Bus subscriptions only hold weak references to these.
    mounted: Vec<Arc<dyn Presenter>>,
}

impl Storefront {
    pub fn new(config: ConfigState, transport: Arc<dyn StoreTransport>) -> Result<Self, AppError> {
        let bus = Arc::new(EventBus::new());

        let catalog = Arc::new(CatalogState::new(Arc::clone(&bus)));
        let cart = Arc::new(CartState::new(Arc::clone(&bus)));
        let buyer = Arc::new(BuyerState::new(Arc::clone(&bus)));
        catalog.connect();
        cart.connect(&catalog);
        buyer.connect();

        let checkout = Arc::new(Checkout::new(
            Arc::clone(&bus),
            Arc::clone(&cart),
            Arc::clone(&buyer),
            Arc::clone(&transport),
        ));
        checkout.connect();

        let mut storefront = Storefront {
            bus,
            catalog,
            cart,
            buyer,
            checkout,
            surface: Arc::new(Surface::new()),
            transport,
            config,
            mounted: Vec::new(),
        };
        storefront.mount_presenters()?;
        info!(
            store = %storefront.config.store_name,
            presenters = storefront.mounted.len(),
            subscribers = storefront.bus.subscriber_count(),
            "Storefront wired"
        );
        Ok(storefront)
    }

    fn mount_presenters(&mut self) -> Result<(), AppError> {
        let config = self.config.clone();
        let surface = Arc::clone(&self.surface);

        self.attach(HeaderPresenter::new(
            Arc::clone(&self.cart),
            Arc::clone(&surface),
            HeaderView::new(config.clone()),
        ))?;
        self.attach(GalleryPresenter::new(
            Arc::clone(&self.catalog),
            Arc::clone(&surface),
            GalleryView::new(config.clone()),
        ))?;
        self.attach(PreviewPresenter::new(
            Arc::clone(&self.catalog),
            Arc::clone(&self.cart),
            Arc::clone(&surface),
            PreviewView::new(config.clone()),
        ))?;
        self.attach(BasketPresenter::new(
            Arc::clone(&self.cart),
            Arc::clone(&surface),
            BasketView::new(config.clone()),
        ))?;
        self.attach(OrderFormPresenter::new(Arc::clone(&self.buyer), Arc::clone(&surface)))?;
        self.attach(ContactsFormPresenter::new(
            Arc::clone(&self.buyer),
            Arc::clone(&self.cart),
            Arc::clone(&self.checkout),
            Arc::clone(&surface),
        ))?;
        self.attach(SuccessPresenter::new(
            Arc::clone(&self.checkout),
            Arc::clone(&surface),
            SuccessView::new(config.clone()),
        ))?;
        self.attach(ModalPresenter::new(Arc::clone(&surface)))?;
        Ok(())
    }

    fn attach<P: Presenter>(&mut self, presenter: P) -> Result<(), AppError> {
        let presenter = Arc::new(presenter);
        mount(&presenter, &self.bus).map_err(|e| AppError::internal(e.to_string()))?;
        self.mounted.push(presenter);
        Ok(())
    }

    // =========================================================================
    // Actions
    // =========================================================================

    /// Fetches the catalog and replaces Catalog State.
    ///
    /// On failure the catalog keeps its last value and `CatalogFetchFailed`
    /// is published.
    pub async fn load_catalog(&self) -> Result<usize, AppError> {
        match self.transport.fetch_catalog().await {
            Ok(products) => {
                let count = products.len();
                self.catalog.set_products(products);
                info!(count, "Catalog loaded");
                Ok(count)
            }
            Err(err) => {
                warn!(error = %err, "Catalog fetch failed");
                self.bus.publish(StoreEvent::CatalogFetchFailed {
                    message: err.user_message(),
                });
                Err(err.into())
            }
        }
    }

    /// Presses a visible button, publishing its intent.
    pub fn press(&self, key: &str) -> Result<(), AppError> {
        match self.surface.find_button(key) {
            Some(Control::Button {
                enabled: false, ..
            }) => Err(AppError::disabled(key)),
            Some(Control::Button { intent, .. }) => self.publish(intent),
            _ => Err(AppError::unknown_control(key)),
        }
    }

    /// Edits a visible input, publishing `BuyerFieldEdited`.
    pub fn fill(&self, field: BuyerField, value: &str) -> Result<(), AppError> {
        if self.surface.find_input(field).is_none() {
            return Err(AppError::unknown_control(field));
        }
        self.publish(StoreEvent::BuyerFieldEdited {
            field,
            value: value.to_string(),
        })
    }

    fn publish(&self, event: StoreEvent) -> Result<(), AppError> {
        let name = event.name();
        let report = self.bus.publish(event);
        if report.is_clean() {
            Ok(())
        } else {
            Err(AppError::new(
                ErrorCode::Internal,
                format!("'{}' was not fully handled", name),
            ))
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    pub fn surface(&self) -> &Arc<Surface> {
        &self.surface
    }

    pub fn catalog(&self) -> &Arc<CatalogState> {
        &self.catalog
    }

    pub fn cart(&self) -> &Arc<CartState> {
        &self.cart
    }

    pub fn buyer(&self) -> &Arc<BuyerState> {
        &self.buyer
    }

    pub fn checkout(&self) -> &Arc<Checkout> {
        &self.checkout
    }

    pub fn config(&self) -> &ConfigState {
        &self.config
    }
}
