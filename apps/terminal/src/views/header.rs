//! Page header: store name and basket counter.

use std::sync::Arc;

use storefront_core::{CartState, EventFilter, EventKind, StoreEvent};

use super::{Control, Element, Presenter, View};
use crate::state::ConfigState;
use crate::surface::{Slot, Surface};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderModel {
    pub item_count: usize,
}

#[derive(Debug, Clone)]
pub struct HeaderView {
    config: ConfigState,
}

impl HeaderView {
    pub fn new(config: ConfigState) -> Self {
        HeaderView { config }
    }
}

impl View for HeaderView {
    type Model = HeaderModel;

    fn render(&self, model: &HeaderModel) -> Element {
        Element::titled(&self.config.store_name).control(Control::button(
            "basket",
            format!("Basket ({})", model.item_count),
            StoreEvent::BasketOpened,
        ))
    }
}

pub struct HeaderPresenter {
    cart: Arc<CartState>,
    surface: Arc<Surface>,
    view: HeaderView,
}

impl HeaderPresenter {
    pub fn new(cart: Arc<CartState>, surface: Arc<Surface>, view: HeaderView) -> Self {
        HeaderPresenter { cart, surface, view }
    }
}

impl Presenter for HeaderPresenter {
    fn triggers(&self) -> EventFilter {
        EventKind::CartChanged.into()
    }

    fn refresh(&self, _event: Option<&StoreEvent>) -> anyhow::Result<()> {
        let model = HeaderModel {
            item_count: self.cart.get_item_count(),
        };
        self.surface.set(Slot::Header, self.view.render(&model));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_label() {
        let view = HeaderView::new(ConfigState::default());
        let element = view.render(&HeaderModel { item_count: 2 });

        assert_eq!(element.title.as_deref(), Some("Web Larek"));
        assert_eq!(
            element.button("basket"),
            Some(&Control::button("basket", "Basket (2)", StoreEvent::BasketOpened))
        );
    }
}
