//! # Checkout
//!
//! Turns a pay press into one order submission.
//!
//! ```text
//! order:submit ──► in-flight? ──yes──► CheckoutError::InFlight
//!                      │ no
//!                      ▼
//!             order:pending(true)
//!                      │
//!             build_order(profile, cart) ──err──► order:failed
//!                      │
//!             transport.submit_order ─────err──► order:failed (nothing mutated)
//!                      │ ok
//!             cart.remove_items(ordered) ──► buyer.clear()
//!                      │
//!             order:pending(false) ──► order:placed
//! ```
//!
//! Checkout owns the submission state the contacts and success screens
//! show: [`is_in_flight`](Checkout::is_in_flight),
//! [`failure_notice`](Checkout::failure_notice) and
//! [`last_confirmation`](Checkout::last_confirmation). Each is updated
//! before the event that announces it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use storefront_client::{ClientError, StoreTransport};
use storefront_core::{
    build_order, BuyerState, CartState, CoreError, EventBus, EventKind, OrderConfirmation,
    StoreEvent, SubscriptionId,
};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Shown after any failed submission.
pub const RETRY_MESSAGE: &str = "Could not place the order. Please try again.";

#[derive(Debug, Error)]
pub enum CheckoutError {
    /// A submission is already outstanding.
    #[error("An order is already being placed")]
    InFlight,

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Transport(#[from] ClientError),
}

pub struct Checkout {
    bus: Arc<EventBus>,
    cart: Arc<CartState>,
    buyer: Arc<BuyerState>,
    transport: Arc<dyn StoreTransport>,
    in_flight: AtomicBool,
    notice: Mutex<Option<String>>,
    last_confirmation: Mutex<Option<OrderConfirmation>>,
}

impl Checkout {
    pub fn new(
        bus: Arc<EventBus>,
        cart: Arc<CartState>,
        buyer: Arc<BuyerState>,
        transport: Arc<dyn StoreTransport>,
    ) -> Self {
        Checkout {
            bus,
            cart,
            buyer,
            transport,
            in_flight: AtomicBool::new(false),
            notice: Mutex::new(None),
            last_confirmation: Mutex::new(None),
        }
    }

    /// Subscribes to `order:submit` and `contacts:open`.
    ///
    /// Each submit press spawns [`Checkout::submit`] on the current Tokio
    /// runtime. Opening the contacts step clears a stale failure notice.
    pub fn connect(self: &Arc<Self>) -> Vec<SubscriptionId> {
        let weak = Arc::downgrade(self);
        let submit = self.bus.subscribe(EventKind::OrderSubmitRequested, move |_| {
            let Some(checkout) = weak.upgrade() else {
                return Ok(());
            };
            let handle = tokio::runtime::Handle::try_current()?;
            handle.spawn(async move {
                if let Err(err) = checkout.submit().await {
                    debug!(error = %err, "Submission ended without an order");
                }
            });
            Ok(())
        });

        let weak = Arc::downgrade(self);
        let reopen = self.bus.subscribe(EventKind::ContactsFormOpened, move |_| {
            if let Some(checkout) = weak.upgrade() {
                checkout.notice.lock().take();
            }
            Ok(())
        });

        vec![submit, reopen]
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Message of the last failed submission, until the next attempt or
    /// until the contacts step is reopened.
    pub fn failure_notice(&self) -> Option<String> {
        self.notice.lock().clone()
    }

    /// Confirmation of the most recent successful order.
    pub fn last_confirmation(&self) -> Option<OrderConfirmation> {
        self.last_confirmation.lock().clone()
    }

    /// Builds and submits the order.
    ///
    /// On failure cart and profile are left as they were and `OrderFailed`
    /// is published.
    pub async fn submit(&self) -> Result<OrderConfirmation, CheckoutError> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            warn!("Duplicate order submission ignored");
            return Err(CheckoutError::InFlight);
        }
        let guard = InFlightGuard { checkout: self };
        self.notice.lock().take();
        self.bus
            .publish(StoreEvent::SubmissionStateChanged { in_flight: true });

        let result = self.place().await;
        if let Ok(confirmation) = &result {
            *self.last_confirmation.lock() = Some(confirmation.clone());
        }
        drop(guard);

        match result {
            Ok(confirmation) => {
                info!(order = %confirmation.id, total = %confirmation.total, "Order placed");
                self.bus.publish(StoreEvent::OrderPlaced(confirmation.clone()));
                Ok(confirmation)
            }
            Err(err) => {
                let message = match &err {
                    CheckoutError::Core(core) => core.to_string(),
                    _ => RETRY_MESSAGE.to_string(),
                };
                warn!(error = %err, "Order submission failed");
                *self.notice.lock() = Some(message.clone());
                self.bus.publish(StoreEvent::OrderFailed { message });
                Err(err)
            }
        }
    }

    async fn place(&self) -> Result<OrderConfirmation, CheckoutError> {
        let order = build_order(&self.buyer.get_data(), &self.cart.snapshot())?;
        debug!(items = order.items.len(), total = %order.total, "Submitting order");
        let confirmation = self.transport.submit_order(&order).await?;

        self.cart.remove_items(&order.items);
        self.buyer.clear();
        Ok(confirmation)
    }
}

/// Resets the in-flight flag however the submission ends.
struct InFlightGuard<'a> {
    checkout: &'a Checkout,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.checkout.in_flight.store(false, Ordering::SeqCst);
        self.checkout
            .bus
            .publish(StoreEvent::SubmissionStateChanged { in_flight: false });
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use storefront_client::ClientResult;
    use storefront_core::{BuyerField, Money, Order, Product, ProductId};
    use tokio::sync::Notify;

    /// Transport double. `gate` holds submissions until notified.
    pub(crate) struct MockTransport {
        pub products: Vec<Product>,
        /// Checked on every fetch, so it can be flipped between loads.
        pub fail_catalog: AtomicBool,
        pub fail_order: bool,
        pub gate: Option<Arc<Notify>>,
        pub orders: Mutex<Vec<Order>>,
    }

    impl MockTransport {
        pub(crate) fn new(products: Vec<Product>) -> Self {
            MockTransport {
                products,
                fail_catalog: AtomicBool::new(false),
                fail_order: false,
                gate: None,
                orders: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl StoreTransport for MockTransport {
        async fn fetch_catalog(&self) -> ClientResult<Vec<Product>> {
            if self.fail_catalog.load(Ordering::SeqCst) {
                return Err(ClientError::RequestFailed("connection refused".into()));
            }
            Ok(self.products.clone())
        }

        async fn submit_order(&self, order: &Order) -> ClientResult<OrderConfirmation> {
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            if self.fail_order {
                return Err(ClientError::Api {
                    status: 400,
                    message: "Invalid address".into(),
                });
            }
            self.orders.lock().push(order.clone());
            Ok(OrderConfirmation {
                id: "ord-1".into(),
                total: order.total,
            })
        }
    }

    pub(crate) fn product(id: &str, price: Option<i64>) -> Product {
        Product {
            id: ProductId::new(id),
            title: format!("Item {}", id),
            description: String::new(),
            category: "other".into(),
            image: format!("/{}.svg", id),
            price: price.map(Money::from_units),
        }
    }

    struct Fixture {
        bus: Arc<EventBus>,
        cart: Arc<CartState>,
        buyer: Arc<BuyerState>,
        events: Arc<Mutex<Vec<StoreEvent>>>,
    }

    fn fixture() -> Fixture {
        let bus = Arc::new(EventBus::new());
        let cart = Arc::new(CartState::new(Arc::clone(&bus)));
        let buyer = Arc::new(BuyerState::new(Arc::clone(&bus)));
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        bus.subscribe(
            vec![
                EventKind::CartChanged,
                EventKind::ProfileCleared,
                EventKind::SubmissionStateChanged,
                EventKind::OrderPlaced,
                EventKind::OrderFailed,
            ],
            move |event| {
                sink.lock().push(event.clone());
                Ok(())
            },
        );

        cart.add_item(&product("a", Some(100))).unwrap();
        for (field, value) in [
            (BuyerField::Payment, "card"),
            (BuyerField::Address, "Main St 1"),
            (BuyerField::Email, "a@b.c"),
            (BuyerField::Phone, "+123"),
        ] {
            buyer.set_field(field, value).unwrap();
        }
        events.lock().clear();

        Fixture {
            bus,
            cart,
            buyer,
            events,
        }
    }

    fn checkout(f: &Fixture, transport: MockTransport) -> Arc<Checkout> {
        Arc::new(Checkout::new(
            Arc::clone(&f.bus),
            Arc::clone(&f.cart),
            Arc::clone(&f.buyer),
            Arc::new(transport),
        ))
    }

    #[tokio::test]
    async fn test_success_clears_cart_then_profile() {
        let f = fixture();
        let checkout = checkout(&f, MockTransport::new(Vec::new()));

        let confirmation = checkout.submit().await.unwrap();

        assert_eq!(confirmation.total, Money::from_units(100));
        assert!(f.cart.is_empty());
        assert!(!f.buyer.is_valid());
        assert!(!checkout.is_in_flight());
        assert_eq!(checkout.last_confirmation(), Some(confirmation.clone()));
        assert_eq!(checkout.failure_notice(), None);
        assert_eq!(
            *f.events.lock(),
            vec![
                StoreEvent::SubmissionStateChanged { in_flight: true },
                StoreEvent::CartChanged,
                StoreEvent::ProfileCleared,
                StoreEvent::SubmissionStateChanged { in_flight: false },
                StoreEvent::OrderPlaced(confirmation),
            ]
        );
    }

    #[tokio::test]
    async fn test_failure_mutates_nothing() {
        let f = fixture();
        let mut transport = MockTransport::new(Vec::new());
        transport.fail_order = true;
        let checkout = checkout(&f, transport);
        let profile = f.buyer.get_data();

        let err = checkout.submit().await.unwrap_err();

        assert!(matches!(err, CheckoutError::Transport(ClientError::Api { status: 400, .. })));
        assert_eq!(f.cart.get_item_count(), 1);
        assert_eq!(f.buyer.get_data(), profile);
        assert_eq!(checkout.failure_notice().as_deref(), Some(RETRY_MESSAGE));
        assert_eq!(checkout.last_confirmation(), None);
        assert_eq!(
            f.events.lock().last(),
            Some(&StoreEvent::OrderFailed {
                message: RETRY_MESSAGE.to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_incomplete_profile_is_reported() {
        let f = fixture();
        f.buyer.set_field(BuyerField::Phone, "").unwrap();
        let checkout = checkout(&f, MockTransport::new(Vec::new()));

        let err = checkout.submit().await.unwrap_err();

        assert!(matches!(
            err,
            CheckoutError::Core(CoreError::IncompleteProfile { .. })
        ));
        assert_eq!(f.cart.get_item_count(), 1);
        assert_eq!(
            f.events.lock().last(),
            Some(&StoreEvent::OrderFailed {
                message: "Missing required field(s): phone".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_second_submit_while_pending_is_rejected() {
        let f = fixture();
        let gate = Arc::new(Notify::new());
        let mut transport = MockTransport::new(Vec::new());
        transport.gate = Some(Arc::clone(&gate));
        let checkout = checkout(&f, transport);

        let first = tokio::spawn({
            let checkout = Arc::clone(&checkout);
            async move { checkout.submit().await }
        });
        while !checkout.is_in_flight() {
            tokio::task::yield_now().await;
        }

        let second = checkout.submit().await;
        assert!(matches!(second, Err(CheckoutError::InFlight)));

        gate.notify_one();
        assert!(first.await.unwrap().is_ok());
        assert!(!checkout.is_in_flight());
        assert!(f.cart.is_empty());
    }

    #[tokio::test]
    async fn test_submit_intent_spawns_submission() {
        let f = fixture();
        let checkout = checkout(&f, MockTransport::new(Vec::new()));
        checkout.connect();

        let report = f.bus.publish(StoreEvent::OrderSubmitRequested);
        assert!(report.is_clean());

        for _ in 0..100 {
            if f.cart.is_empty() {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert!(f.cart.is_empty());
    }

    #[tokio::test]
    async fn test_item_added_during_submission_survives() {
        let f = fixture();
        let gate = Arc::new(Notify::new());
        let mut transport = MockTransport::new(Vec::new());
        transport.gate = Some(Arc::clone(&gate));
        let transport = Arc::new(transport);
        let checkout = Arc::new(Checkout::new(
            Arc::clone(&f.bus),
            Arc::clone(&f.cart),
            Arc::clone(&f.buyer),
            Arc::clone(&transport) as Arc<dyn StoreTransport>,
        ));

        let pending = tokio::spawn({
            let checkout = Arc::clone(&checkout);
            async move { checkout.submit().await }
        });
        while !checkout.is_in_flight() {
            tokio::task::yield_now().await;
        }
        f.cart.add_item(&product("b", Some(30))).unwrap();

        gate.notify_one();
        pending.await.unwrap().unwrap();

        assert_eq!(transport.orders.lock()[0].items, vec![ProductId::new("a")]);
        let left: Vec<_> = f.cart.get_items().into_iter().map(|p| p.id).collect();
        assert_eq!(left, vec![ProductId::new("b")]);
        assert_eq!(f.cart.get_total_price(), Money::from_units(30));
    }

    #[tokio::test]
    async fn test_notice_cleared_by_retry_and_reopen() {
        let f = fixture();
        let mut transport = MockTransport::new(Vec::new());
        transport.fail_order = true;
        let checkout = checkout(&f, transport);
        checkout.connect();

        checkout.submit().await.unwrap_err();
        assert!(checkout.failure_notice().is_some());

        f.bus.publish(StoreEvent::ContactsFormOpened);
        assert_eq!(checkout.failure_notice(), None);

        checkout.submit().await.unwrap_err();
        assert!(checkout.failure_notice().is_some());
    }
}
