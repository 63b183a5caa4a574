//! Order confirmation screen.

use std::sync::Arc;

use storefront_core::{EventFilter, EventKind, OrderConfirmation, StoreEvent};

use super::{Control, Element, Presenter, View};
use crate::checkout::Checkout;
use crate::state::ConfigState;
use crate::surface::{ModalScreen, Slot, Surface};

#[derive(Debug, Clone)]
pub struct SuccessView {
    config: ConfigState,
}

impl SuccessView {
    pub fn new(config: ConfigState) -> Self {
        SuccessView { config }
    }
}

impl View for SuccessView {
    type Model = Option<OrderConfirmation>;

    fn render(&self, confirmation: &Option<OrderConfirmation>) -> Element {
        let Some(confirmation) = confirmation else {
            return Element::new();
        };
        Element::titled("Order placed")
            .line(format!("Order {}", confirmation.id))
            .line(format!("Charged {}", self.config.format_money(confirmation.total)))
            .control(Control::button("done", "Continue shopping", StoreEvent::OrderDone))
    }
}

/// Shows [`Checkout::last_confirmation`]. The holders are already reset
/// when `order:placed` arrives, so the order is not re-read from them.
pub struct SuccessPresenter {
    checkout: Arc<Checkout>,
    surface: Arc<Surface>,
    view: SuccessView,
}

impl SuccessPresenter {
    pub fn new(checkout: Arc<Checkout>, surface: Arc<Surface>, view: SuccessView) -> Self {
        SuccessPresenter {
            checkout,
            surface,
            view,
        }
    }
}

impl Presenter for SuccessPresenter {
    fn triggers(&self) -> EventFilter {
        EventKind::OrderPlaced.into()
    }

    fn refresh(&self, _event: Option<&StoreEvent>) -> anyhow::Result<()> {
        let confirmation = self.checkout.last_confirmation();
        self.surface
            .set(Slot::Screen(ModalScreen::Success), self.view.render(&confirmation));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkout::tests::{product, MockTransport};
    use storefront_core::{BuyerField, BuyerState, CartState, EventBus};

    #[tokio::test]
    async fn test_shows_charged_total_after_order() {
        let bus = Arc::new(EventBus::new());
        let cart = Arc::new(CartState::new(Arc::clone(&bus)));
        let buyer = Arc::new(BuyerState::new(Arc::clone(&bus)));
        let checkout = Arc::new(Checkout::new(
            Arc::clone(&bus),
            Arc::clone(&cart),
            Arc::clone(&buyer),
            Arc::new(MockTransport::new(Vec::new())),
        ));
        let surface = Arc::new(Surface::new());
        let presenter = Arc::new(SuccessPresenter::new(
            Arc::clone(&checkout),
            Arc::clone(&surface),
            SuccessView::new(ConfigState::default()),
        ));
        crate::views::mount(&presenter, &bus).unwrap();
        assert_eq!(surface.get(Slot::Screen(ModalScreen::Success)), Some(Element::new()));

        cart.add_item(&product("a", Some(2600))).unwrap();
        for (field, value) in [
            (BuyerField::Payment, "cash"),
            (BuyerField::Address, "Main St 1"),
            (BuyerField::Email, "a@b.c"),
            (BuyerField::Phone, "+123"),
        ] {
            buyer.set_field(field, value).unwrap();
        }
        checkout.submit().await.unwrap();

        let element = surface.get(Slot::Screen(ModalScreen::Success)).unwrap();
        assert_eq!(element.lines, vec!["Order ord-1", "Charged 2 600 synapses"]);
        assert!(element.button("done").is_some());
    }
}
