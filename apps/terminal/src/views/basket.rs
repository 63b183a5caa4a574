//! Basket screen: numbered lines, total, and checkout.

use std::sync::Arc;

use storefront_core::{CartSnapshot, CartState, EventFilter, EventKind, StoreEvent};

use super::{Control, Element, Presenter, View};
use crate::state::ConfigState;
use crate::surface::{ModalScreen, Slot, Surface};

#[derive(Debug, Clone)]
pub struct BasketView {
    config: ConfigState,
}

impl BasketView {
    pub fn new(config: ConfigState) -> Self {
        BasketView { config }
    }
}

impl View for BasketView {
    type Model = CartSnapshot;

    fn render(&self, cart: &CartSnapshot) -> Element {
        let mut element = Element::titled("Basket");
        if cart.is_empty() {
            element.push_line("Basket is empty");
        }
        for line in &cart.lines {
            element.push_line(format!(
                "{}. {}  {}",
                line.index,
                line.product.title,
                self.config.format_money(line.price)
            ));
            element.push_control(Control::button(
                format!("r{}", line.index),
                format!("Remove {}", line.product.title),
                StoreEvent::CartRemoveRequested(line.product.id.clone()),
            ));
        }
        element.push_line(format!("Total: {}", self.config.format_money(cart.total)));
        element.control(
            Control::button("checkout", "Checkout", StoreEvent::OrderFormOpened)
                .enabled(!cart.is_empty()),
        )
    }
}

pub struct BasketPresenter {
    cart: Arc<CartState>,
    surface: Arc<Surface>,
    view: BasketView,
}

impl BasketPresenter {
    pub fn new(cart: Arc<CartState>, surface: Arc<Surface>, view: BasketView) -> Self {
        BasketPresenter { cart, surface, view }
    }
}

impl Presenter for BasketPresenter {
    fn triggers(&self) -> EventFilter {
        EventKind::CartChanged.into()
    }

    fn refresh(&self, _event: Option<&StoreEvent>) -> anyhow::Result<()> {
        let snapshot = self.cart.snapshot();
        self.surface
            .set(Slot::Screen(ModalScreen::Basket), self.view.render(&snapshot));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_core::{CartLine, Money, Product, ProductId};

    fn line(index: usize, id: &str, price: i64) -> CartLine {
        CartLine {
            index,
            product: Product {
                id: ProductId::new(id),
                title: format!("Item {}", id),
                description: String::new(),
                category: "other".into(),
                image: String::new(),
                price: Some(Money::from_units(price)),
            },
            price: Money::from_units(price),
        }
    }

    #[test]
    fn test_lines_and_total() {
        let view = BasketView::new(ConfigState::default());
        let snapshot = CartSnapshot {
            lines: vec![line(1, "a", 100), line(2, "c", 2500)],
            total: Money::from_units(2600),
        };

        let element = view.render(&snapshot);

        assert_eq!(
            element.lines,
            vec![
                "1. Item a  100 synapses",
                "2. Item c  2 500 synapses",
                "Total: 2 600 synapses",
            ]
        );
        assert_eq!(
            element.button("r2"),
            Some(&Control::button(
                "r2",
                "Remove Item c",
                StoreEvent::CartRemoveRequested(ProductId::new("c"))
            ))
        );
        assert_eq!(
            element.button("checkout"),
            Some(&Control::button("checkout", "Checkout", StoreEvent::OrderFormOpened))
        );
    }

    #[test]
    fn test_empty_basket_disables_checkout() {
        let view = BasketView::new(ConfigState::default());
        let element = view.render(&CartSnapshot::default());

        assert_eq!(element.lines[0], "Basket is empty");
        assert!(matches!(
            element.button("checkout"),
            Some(Control::Button { enabled: false, .. })
        ));
    }
}
