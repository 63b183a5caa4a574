//! Product preview with the buy/remove toggle.

use std::sync::Arc;

use storefront_core::{CartState, CatalogState, EventFilter, EventKind, Product, StoreEvent};

use super::{Control, Element, Presenter, View};
use crate::state::ConfigState;
use crate::surface::{ModalScreen, Slot, Surface};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreviewModel {
    pub product: Option<Product>,
    pub in_cart: bool,
}

#[derive(Debug, Clone)]
pub struct PreviewView {
    config: ConfigState,
}

impl PreviewView {
    pub fn new(config: ConfigState) -> Self {
        PreviewView { config }
    }
}

impl View for PreviewView {
    type Model = PreviewModel;

    fn render(&self, model: &PreviewModel) -> Element {
        let Some(product) = &model.product else {
            return Element::new();
        };

        let mut element = Element::titled(&product.title)
            .line(format!("Category: {}", product.category))
            .line(format!("Image: {}", product.image));
        if !product.description.is_empty() {
            element.push_line(product.description.clone());
        }
        element.push_line(format!("Price: {}", self.config.format_price(product.price)));

        let buy = if !product.is_purchasable() {
            Control::button("buy", "Unavailable", StoreEvent::PreviewToggle).enabled(false)
        } else if model.in_cart {
            Control::button("buy", "Remove from basket", StoreEvent::PreviewToggle)
        } else {
            Control::button("buy", "Buy", StoreEvent::PreviewToggle)
        };
        element.control(buy)
    }
}

pub struct PreviewPresenter {
    catalog: Arc<CatalogState>,
    cart: Arc<CartState>,
    surface: Arc<Surface>,
    view: PreviewView,
}

impl PreviewPresenter {
    pub fn new(
        catalog: Arc<CatalogState>,
        cart: Arc<CartState>,
        surface: Arc<Surface>,
        view: PreviewView,
    ) -> Self {
        PreviewPresenter {
            catalog,
            cart,
            surface,
            view,
        }
    }
}

impl Presenter for PreviewPresenter {
    fn triggers(&self) -> EventFilter {
        EventFilter::Kinds(vec![EventKind::PreviewChanged, EventKind::CartChanged])
    }

    fn refresh(&self, _event: Option<&StoreEvent>) -> anyhow::Result<()> {
        let product = self.catalog.get_selected();
        let in_cart = product
            .as_ref()
            .is_some_and(|product| self.cart.has_item(&product.id));
        let model = PreviewModel { product, in_cart };
        self.surface
            .set(Slot::Screen(ModalScreen::Preview), self.view.render(&model));
        Ok(())
    }
}
