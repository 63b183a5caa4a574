//! # Cart State
//!
//! Manages the basket: the set of products the buyer intends to order.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart State Operations                                │
//! │                                                                         │
//! │  Presenter Intent         Operation               Cart Change           │
//! │  ────────────────         ─────────               ───────────           │
//! │                                                                         │
//! │  preview:toggle ─────────► add_item() ──────────► items.push(item)      │
//! │    (not in cart)                                                        │
//! │                                                                         │
//! │  preview:toggle ─────────► remove_item() ───────► items.retain(..)      │
//! │    (in cart)                                                            │
//! │                                                                         │
//! │  cart:remove ────────────► remove_item() ───────► items.retain(..)      │
//! │                                                                         │
//! │  order:placed path ──────► remove_items() ──────► items.retain(..)      │
//! │    (ordered ids only)                                                   │
//! │                                                                         │
//! │  Presenter re-render ────► snapshot() ──────────► (read only)           │
//! │                                                                         │
//! │  NOTE: every write publishes exactly one cart:changed, even when the    │
//! │        call changed nothing.                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use tracing::{debug, info};

use crate::bus::{EventBus, EventKind, StoreEvent, SubscriptionId};
use crate::catalog::CatalogState;
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{Product, ProductId};

/// An item in the cart.
///
/// ## Design Notes
/// The product is a frozen copy taken when the item was added, so the
/// basket keeps showing what the buyer chose even if the catalog is
/// reloaded afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartItem {
    pub product: Product,

    /// When this item was added to cart
    pub added_at: DateTime<Utc>,
}

impl CartItem {
    /// Freezes a purchasable product into a cart item.
    fn from_product(product: &Product) -> CoreResult<(Self, Money)> {
        let price = product
            .price
            .ok_or_else(|| CoreError::NotPurchasable(product.id.clone()))?;
        let item = CartItem {
            product: product.clone(),
            added_at: Utc::now(),
        };
        Ok((item, price))
    }

    pub fn id(&self) -> &ProductId {
        &self.product.id
    }

    /// Price of the item. Items only enter the cart with a price.
    pub fn price(&self) -> Money {
        self.product.price.unwrap_or_default()
    }
}

/// The shopping cart.
///
/// ## Invariants
/// - Items are unique by product id (membership, not quantity)
/// - Every item has a price
/// - The total never overflows `Money`
/// - Items keep first-add order; re-adding does not move an item
#[derive(Debug, Clone, Default, Serialize)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self {
        Cart::default()
    }

    /// Adds a product if it is not already present.
    ///
    /// ## Returns
    /// - `Ok(true)` when the product was added, `Ok(false)` when it was
    ///   already in the cart
    /// - `Err(CoreError::NotPurchasable)` when the product has no price
    /// - `Err(CoreError::TotalOverflow)` when its price would overflow the total
    pub fn add_item(&mut self, product: &Product) -> CoreResult<bool> {
        let (item, price) = CartItem::from_product(product)?;
        if self.has_item(&product.id) {
            return Ok(false);
        }
        self.total_price()
            .checked_add(price)
            .ok_or_else(|| CoreError::TotalOverflow(product.id.clone()))?;
        self.items.push(item);
        Ok(true)
    }

    /// Removes an item. Returns whether anything was removed.
    pub fn remove_item(&mut self, id: &ProductId) -> bool {
        let initial_len = self.items.len();
        self.items.retain(|item| item.id() != id);
        self.items.len() != initial_len
    }

    /// Removes every listed item. Returns how many were removed.
    pub fn remove_items(&mut self, ids: &[ProductId]) -> usize {
        let initial_len = self.items.len();
        self.items.retain(|item| !ids.contains(item.id()));
        initial_len - self.items.len()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn has_item(&self, id: &ProductId) -> bool {
        self.items.iter().any(|item| item.id() == id)
    }

    /// Items in insertion order.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Returns the number of distinct products in the cart.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Sum of the contained products' prices. `add_item` keeps it in range.
    pub fn total_price(&self) -> Money {
        self.items.iter().map(CartItem::price).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// One basket row as displayed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartLine {
    /// 1-based display index.
    pub index: usize,
    pub product: Product,
    pub price: Money,
}

/// Point-in-time copy of the cart for presenters and order assembly.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CartSnapshot {
    pub lines: Vec<CartLine>,
    pub total: Money,
}

impl CartSnapshot {
    pub fn item_count(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Product ids in cart order.
    pub fn item_ids(&self) -> Vec<ProductId> {
        self.lines.iter().map(|line| line.product.id.clone()).collect()
    }
}

impl From<&Cart> for CartSnapshot {
    fn from(cart: &Cart) -> Self {
        let lines = cart
            .items()
            .iter()
            .enumerate()
            .map(|(i, item)| CartLine {
                index: i + 1,
                product: item.product.clone(),
                price: item.price(),
            })
            .collect();
        CartSnapshot {
            lines,
            total: cart.total_price(),
        }
    }
}

/// Bus-attached cart holder.
///
/// The lock is released before `cart:changed` is published, so handlers
/// reacting to the notification can read the cart.
#[derive(Debug)]
pub struct CartState {
    bus: Arc<EventBus>,
    cart: RwLock<Cart>,
}

impl CartState {
    pub fn new(bus: Arc<EventBus>) -> Self {
        CartState {
            bus,
            cart: RwLock::new(Cart::new()),
        }
    }

    /// Subscribes to `cart:remove` and `preview:toggle`.
    ///
    /// The toggle reads the current preview selection from `catalog`.
    pub fn connect(self: &Arc<Self>, catalog: &Arc<CatalogState>) -> Vec<SubscriptionId> {
        let weak = Arc::downgrade(self);
        let remove = self.bus.subscribe(EventKind::CartRemoveRequested, move |event| {
            if let (Some(cart), StoreEvent::CartRemoveRequested(id)) = (weak.upgrade(), event) {
                cart.remove_item(id);
            }
            Ok(())
        });

        let weak = Arc::downgrade(self);
        let catalog = Arc::downgrade(catalog);
        let toggle = self.bus.subscribe(EventKind::PreviewToggle, move |_| {
            let (Some(cart), Some(catalog)) = (weak.upgrade(), catalog.upgrade()) else {
                return Ok(());
            };
            let Some(product) = catalog.get_selected() else {
                debug!("Preview toggle without a selection");
                return Ok(());
            };
            cart.toggle(&product)?;
            Ok(())
        });

        vec![remove, toggle]
    }

    /// Adds when absent, removes when present.
    pub fn toggle(&self, product: &Product) -> CoreResult<()> {
        if self.has_item(&product.id) {
            self.remove_item(&product.id);
            Ok(())
        } else {
            self.add_item(product)
        }
    }

    /// Adds a product to the cart.
    ///
    /// An unpurchasable product is refused without publishing.
    pub fn add_item(&self, product: &Product) -> CoreResult<()> {
        let added = self.cart.write().add_item(product)?;
        if added {
            info!(product = %product.id, "Added to cart");
        }
        self.bus.publish(StoreEvent::CartChanged);
        Ok(())
    }

    pub fn remove_item(&self, id: &ProductId) {
        if self.cart.write().remove_item(id) {
            info!(product = %id, "Removed from cart");
        }
        self.bus.publish(StoreEvent::CartChanged);
    }

    /// Removes the listed products, publishing one `cart:changed`.
    ///
    /// Items added after `ids` was taken stay in the cart.
    pub fn remove_items(&self, ids: &[ProductId]) {
        let removed = self.cart.write().remove_items(ids);
        debug!(removed, remaining = self.get_item_count(), "Ordered items removed");
        self.bus.publish(StoreEvent::CartChanged);
    }

    pub fn clear(&self) {
        self.cart.write().clear();
        debug!("Cart cleared");
        self.bus.publish(StoreEvent::CartChanged);
    }

    pub fn has_item(&self, id: &ProductId) -> bool {
        self.cart.read().has_item(id)
    }

    /// Products in insertion order.
    pub fn get_items(&self) -> Vec<Product> {
        self.cart
            .read()
            .items()
            .iter()
            .map(|item| item.product.clone())
            .collect()
    }

    pub fn lines(&self) -> Vec<CartLine> {
        self.snapshot().lines
    }

    pub fn get_item_count(&self) -> usize {
        self.cart.read().item_count()
    }

    pub fn get_total_price(&self) -> Money {
        self.cart.read().total_price()
    }

    pub fn is_empty(&self) -> bool {
        self.cart.read().is_empty()
    }

    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot::from(&*self.cart.read())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tests::product;
    use parking_lot::Mutex;
    use proptest::prelude::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_bus() -> (Arc<EventBus>, Arc<AtomicUsize>) {
        let bus = Arc::new(EventBus::new());
        let count = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&count);
        bus.subscribe(EventKind::CartChanged, move |_| {
            c.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
        (bus, count)
    }

    #[test]
    fn test_cart_add_item() {
        let mut cart = Cart::new();
        assert!(cart.add_item(&product("a", Some(100))).unwrap());

        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.total_price(), Money::from_units(100));
    }

    #[test]
    fn test_re_adding_keeps_position() {
        let mut cart = Cart::new();
        let a = product("a", Some(1));
        let b = product("b", Some(2));
        cart.add_item(&a).unwrap();
        cart.add_item(&b).unwrap();

        assert!(!cart.add_item(&a).unwrap());

        let ids: Vec<_> = cart.items().iter().map(|i| i.id().as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_add_refuses_total_overflow() {
        let (bus, changes) = counting_bus();
        let cart = CartState::new(bus);
        cart.add_item(&product("big", Some(i64::MAX))).unwrap();

        let err = cart.add_item(&product("one", Some(1))).unwrap_err();
        assert!(matches!(err, CoreError::TotalOverflow(ref id) if id.as_str() == "one"));
        assert_eq!(cart.get_item_count(), 1);
        assert_eq!(cart.get_total_price(), Money::from_units(i64::MAX));
        assert_eq!(changes.load(Ordering::SeqCst), 1);

        // A negative adjustment still fits.
        cart.add_item(&product("credit", Some(-1))).unwrap();
        assert_eq!(cart.get_total_price(), Money::from_units(i64::MAX - 1));
    }

    #[test]
    fn test_priceless_product_scenario() {
        let (bus, changes) = counting_bus();
        let cart = CartState::new(bus);

        let a = product("a", Some(100));
        let b = product("b", None);

        assert!(matches!(cart.add_item(&b), Err(CoreError::NotPurchasable(_))));
        assert!(cart.get_items().is_empty());
        assert_eq!(changes.load(Ordering::SeqCst), 0);

        cart.add_item(&a).unwrap();
        assert_eq!(cart.get_total_price(), Money::from_units(100));
        assert_eq!(changes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_every_mutation_publishes_once() {
        let (bus, changes) = counting_bus();
        let cart = CartState::new(bus);
        let a = product("a", Some(5));

        cart.add_item(&a).unwrap();
        cart.add_item(&a).unwrap(); // no-op, still notifies
        cart.remove_item(&ProductId::new("missing"));
        assert_eq!(changes.load(Ordering::SeqCst), 3);

        cart.clear();
        assert!(cart.get_items().is_empty());
        assert_eq!(changes.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_remove_items_keeps_unlisted() {
        let (bus, changes) = counting_bus();
        let cart = CartState::new(bus);
        for id in ["a", "b", "c"] {
            cart.add_item(&product(id, Some(1))).unwrap();
        }
        changes.store(0, Ordering::SeqCst);

        cart.remove_items(&[ProductId::new("a"), ProductId::new("c"), ProductId::new("gone")]);

        let ids: Vec<_> = cart.get_items().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![ProductId::new("b")]);
        assert_eq!(changes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_snapshot_lines_are_one_based() {
        let cart = CartState::new(Arc::new(EventBus::new()));
        cart.add_item(&product("a", Some(10))).unwrap();
        cart.add_item(&product("b", Some(20))).unwrap();

        let snapshot = cart.snapshot();
        assert_eq!(snapshot.lines[0].index, 1);
        assert_eq!(snapshot.lines[1].index, 2);
        assert_eq!(snapshot.total, Money::from_units(30));
        assert_eq!(
            snapshot.item_ids(),
            vec![ProductId::new("a"), ProductId::new("b")]
        );
    }

    #[test]
    fn test_handler_reads_cart_after_change() {
        let bus = Arc::new(EventBus::new());
        let cart = Arc::new(CartState::new(Arc::clone(&bus)));
        let seen = Arc::new(Mutex::new(Vec::new()));

        let weak = Arc::downgrade(&cart);
        let s = Arc::clone(&seen);
        bus.subscribe(EventKind::CartChanged, move |_| {
            if let Some(cart) = weak.upgrade() {
                s.lock().push(cart.get_item_count());
            }
            Ok(())
        });

        cart.add_item(&product("a", Some(1))).unwrap();
        cart.clear();
        assert_eq!(*seen.lock(), vec![1, 0]);
    }

    #[test]
    fn test_remove_intent() {
        let bus = Arc::new(EventBus::new());
        let catalog = Arc::new(CatalogState::new(Arc::clone(&bus)));
        let cart = Arc::new(CartState::new(Arc::clone(&bus)));
        cart.connect(&catalog);

        cart.add_item(&product("a", Some(1))).unwrap();
        bus.publish(StoreEvent::CartRemoveRequested(ProductId::new("a")));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_preview_toggle_adds_then_removes() {
        let bus = Arc::new(EventBus::new());
        let catalog = Arc::new(CatalogState::new(Arc::clone(&bus)));
        let cart = Arc::new(CartState::new(Arc::clone(&bus)));
        catalog.connect();
        cart.connect(&catalog);

        bus.publish(StoreEvent::ProductSelected(product("a", Some(100))));
        bus.publish(StoreEvent::PreviewToggle);
        assert!(cart.has_item(&ProductId::new("a")));

        bus.publish(StoreEvent::PreviewToggle);
        assert!(!cart.has_item(&ProductId::new("a")));
    }

    #[test]
    fn test_preview_toggle_on_priceless_product_is_rejected() {
        let bus = Arc::new(EventBus::new());
        let catalog = Arc::new(CatalogState::new(Arc::clone(&bus)));
        let cart = Arc::new(CartState::new(Arc::clone(&bus)));
        catalog.connect();
        cart.connect(&catalog);

        catalog.set_selected(product("b", None));
        let report = bus.publish(StoreEvent::PreviewToggle);

        assert_eq!(report.failed.len(), 1);
        assert!(cart.is_empty());
    }

    #[derive(Debug, Clone)]
    enum Op {
        Add(usize),
        Remove(usize),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0usize..6).prop_map(Op::Add),
            (0usize..6).prop_map(Op::Remove),
        ]
    }

    proptest! {
        #[test]
        fn prop_count_and_total_track_distinct_members(ops in proptest::collection::vec(op(), 0..40)) {
            // Product 5 is priceless and must never enter the cart.
            let products: Vec<Product> = (0..6)
                .map(|i| product(&format!("p{i}"), (i != 5).then_some(10 * (i as i64 + 1))))
                .collect();
            let mut cart = Cart::new();
            let mut model: Vec<usize> = Vec::new();

            for op in ops {
                match op {
                    Op::Add(i) => {
                        let result = cart.add_item(&products[i]);
                        if i == 5 {
                            prop_assert!(result.is_err());
                        } else if !model.contains(&i) {
                            model.push(i);
                        }
                    }
                    Op::Remove(i) => {
                        cart.remove_item(&products[i].id);
                        model.retain(|m| *m != i);
                    }
                }
            }

            let expected_total: Money = model
                .iter()
                .filter_map(|i| products[*i].price)
                .sum();
            prop_assert_eq!(cart.item_count(), model.len());
            prop_assert_eq!(cart.total_price(), expected_total);
            prop_assert!(!cart.has_item(&products[5].id));
        }
    }
}
