//! Modal frame and screen routing.
//!
//! | Event                  | Modal              |
//! |------------------------|--------------------|
//! | `product:select`       | open Preview       |
//! | `basket:open`          | open Basket        |
//! | `order:open`           | open OrderForm     |
//! | `contacts:open`        | open Contacts      |
//! | `order:placed`         | open Success       |
//! | `preview:toggle`       | close              |
//! | `modal:close`          | close              |
//! | `order:done`           | close              |

use std::sync::Arc;

use storefront_core::{EventFilter, EventKind, StoreEvent};

use super::{Control, Element, Presenter, View};
use crate::surface::{ModalScreen, Slot, Surface};

#[derive(Debug, Clone, Default)]
pub struct ModalView;

impl View for ModalView {
    type Model = ();

    fn render(&self, _: &()) -> Element {
        Element::new().control(Control::button("close", "Close", StoreEvent::ModalClosed))
    }
}

pub struct ModalPresenter {
    surface: Arc<Surface>,
    view: ModalView,
}

impl ModalPresenter {
    pub fn new(surface: Arc<Surface>) -> Self {
        ModalPresenter {
            surface,
            view: ModalView,
        }
    }

    fn route(event: &StoreEvent) -> Option<Option<ModalScreen>> {
        match event {
            StoreEvent::ProductSelected(_) => Some(Some(ModalScreen::Preview)),
            StoreEvent::BasketOpened => Some(Some(ModalScreen::Basket)),
            StoreEvent::OrderFormOpened => Some(Some(ModalScreen::OrderForm)),
            StoreEvent::ContactsFormOpened => Some(Some(ModalScreen::Contacts)),
            StoreEvent::OrderPlaced(_) => Some(Some(ModalScreen::Success)),
            StoreEvent::PreviewToggle | StoreEvent::ModalClosed | StoreEvent::OrderDone => {
                Some(None)
            }
            _ => None,
        }
    }
}

impl Presenter for ModalPresenter {
    fn triggers(&self) -> EventFilter {
        EventFilter::Kinds(vec![
            EventKind::ProductSelected,
            EventKind::BasketOpened,
            EventKind::OrderFormOpened,
            EventKind::ContactsFormOpened,
            EventKind::OrderPlaced,
            EventKind::PreviewToggle,
            EventKind::ModalClosed,
            EventKind::OrderDone,
        ])
    }

    fn refresh(&self, event: Option<&StoreEvent>) -> anyhow::Result<()> {
        let Some(event) = event else {
            self.surface.set(Slot::ModalFrame, self.view.render(&()));
            return Ok(());
        };
        match Self::route(event) {
            Some(Some(screen)) => self.surface.open_modal(screen),
            Some(None) => self.surface.close_modal(),
            None => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_core::EventBus;

    use crate::views::mount;

    #[test]
    fn test_routing() {
        let bus = EventBus::new();
        let surface = Arc::new(Surface::new());
        let presenter = Arc::new(ModalPresenter::new(Arc::clone(&surface)));
        mount(&presenter, &bus).unwrap();

        assert!(surface.get(Slot::ModalFrame).unwrap().button("close").is_some());

        bus.publish(StoreEvent::BasketOpened);
        assert_eq!(surface.modal(), Some(ModalScreen::Basket));

        bus.publish(StoreEvent::OrderFormOpened);
        assert_eq!(surface.modal(), Some(ModalScreen::OrderForm));

        bus.publish(StoreEvent::ModalClosed);
        assert_eq!(surface.modal(), None);

        bus.publish(StoreEvent::ContactsFormOpened);
        bus.publish(StoreEvent::OrderDone);
        assert_eq!(surface.modal(), None);
    }
}
