//! # Checkout Forms
//!
//! ```text
//! ┌──────────────────────────┐  next   ┌──────────────────────────┐  pay
//! │ OrderForm                │ ──────► │ Contacts                 │ ─────► order:submit
//! │  payment (card | cash)   │         │  email                   │
//! │  address                 │         │  phone                   │
//! └──────────────────────────┘         └──────────────────────────┘
//! ```
//!
//! Both screens render from the same [`FormModel`]. Field errors of a step
//! stay hidden until one of its fields has been filled.

use std::sync::Arc;

use storefront_core::{
    BuyerField, BuyerProfile, BuyerState, CartState, EventFilter, EventKind, FieldErrors, FormStep,
    PaymentMethod, StoreEvent,
};

use super::{Control, Element, Presenter, View};
use crate::checkout::Checkout;
use crate::surface::{ModalScreen, Slot, Surface};

/// Everything either checkout step displays.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormModel {
    pub profile: BuyerProfile,
    pub errors: FieldErrors,
    pub cart_empty: bool,
    pub in_flight: bool,
    /// Message from the last failed submission.
    pub notice: Option<String>,
}

impl FormModel {
    /// True when the given step has no missing fields.
    pub fn step_valid(&self, step: FormStep) -> bool {
        self.errors.for_step(step).is_empty()
    }

    fn touched(&self, step: FormStep) -> bool {
        BuyerField::ALL
            .iter()
            .any(|field| field.step() == step && self.profile.is_set(*field))
    }

    fn push_errors(&self, element: &mut Element, step: FormStep) {
        if !self.touched(step) {
            return;
        }
        for (_, message) in self.errors.for_step(step).iter() {
            element.push_line(format!("! {}", message));
        }
    }
}

// =============================================================================
// Order Step
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct OrderFormView;

impl View for OrderFormView {
    type Model = FormModel;

    fn render(&self, model: &FormModel) -> Element {
        let mut element = Element::titled("Payment and delivery");
        for method in PaymentMethod::ALL {
            let marker = if model.profile.payment == Some(method) { "*" } else { " " };
            let label = match method {
                PaymentMethod::Card => "Online",
                PaymentMethod::Cash => "On delivery",
            };
            element.push_control(Control::button(
                method.as_str(),
                format!("{} {}", marker, label),
                StoreEvent::BuyerFieldEdited {
                    field: BuyerField::Payment,
                    value: method.as_str().to_string(),
                },
            ));
        }
        element.push_control(Control::input(
            BuyerField::Address,
            model.profile.address.clone(),
        ));
        model.push_errors(&mut element, FormStep::Order);
        element.control(
            Control::button("next", "Next", StoreEvent::ContactsFormOpened)
                .enabled(model.step_valid(FormStep::Order)),
        )
    }
}

pub struct OrderFormPresenter {
    buyer: Arc<BuyerState>,
    surface: Arc<Surface>,
    view: OrderFormView,
}

impl OrderFormPresenter {
    pub fn new(buyer: Arc<BuyerState>, surface: Arc<Surface>) -> Self {
        OrderFormPresenter {
            buyer,
            surface,
            view: OrderFormView,
        }
    }
}

impl Presenter for OrderFormPresenter {
    fn triggers(&self) -> EventFilter {
        EventFilter::Kinds(vec![EventKind::ProfileChanged, EventKind::ProfileCleared])
    }

    fn refresh(&self, _event: Option<&StoreEvent>) -> anyhow::Result<()> {
        let model = FormModel {
            profile: self.buyer.get_data(),
            errors: self.buyer.validate(),
            ..FormModel::default()
        };
        self.surface
            .set(Slot::Screen(ModalScreen::OrderForm), self.view.render(&model));
        Ok(())
    }
}

// =============================================================================
// Contacts Step
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct ContactsFormView;

impl View for ContactsFormView {
    type Model = FormModel;

    fn render(&self, model: &FormModel) -> Element {
        let mut element = Element::titled("Contacts")
            .control(Control::input(BuyerField::Email, model.profile.email.clone()))
            .control(Control::input(BuyerField::Phone, model.profile.phone.clone()));
        model.push_errors(&mut element, FormStep::Contacts);
        if let Some(notice) = &model.notice {
            element.push_line(format!("! {}", notice));
        }

        let label = if model.in_flight { "Placing order..." } else { "Pay" };
        let ready = model.step_valid(FormStep::Contacts) && !model.cart_empty && !model.in_flight;
        element.control(Control::button("pay", label, StoreEvent::OrderSubmitRequested).enabled(ready))
    }
}

/// Pulls submission state from [`Checkout`] on every refresh.
pub struct ContactsFormPresenter {
    buyer: Arc<BuyerState>,
    cart: Arc<CartState>,
    checkout: Arc<Checkout>,
    surface: Arc<Surface>,
    view: ContactsFormView,
}

impl ContactsFormPresenter {
    pub fn new(
        buyer: Arc<BuyerState>,
        cart: Arc<CartState>,
        checkout: Arc<Checkout>,
        surface: Arc<Surface>,
    ) -> Self {
        ContactsFormPresenter {
            buyer,
            cart,
            checkout,
            surface,
            view: ContactsFormView,
        }
    }
}

impl Presenter for ContactsFormPresenter {
    fn triggers(&self) -> EventFilter {
        EventFilter::Kinds(vec![
            EventKind::ProfileChanged,
            EventKind::ProfileCleared,
            EventKind::CartChanged,
            EventKind::ContactsFormOpened,
            EventKind::SubmissionStateChanged,
            EventKind::OrderFailed,
        ])
    }

    fn refresh(&self, _event: Option<&StoreEvent>) -> anyhow::Result<()> {
        let model = FormModel {
            profile: self.buyer.get_data(),
            errors: self.buyer.validate(),
            cart_empty: self.cart.is_empty(),
            in_flight: self.checkout.is_in_flight(),
            notice: self.checkout.failure_notice(),
        };
        self.surface
            .set(Slot::Screen(ModalScreen::Contacts), self.view.render(&model));
        Ok(())
    }
}
