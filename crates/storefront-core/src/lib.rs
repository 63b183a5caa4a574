//! # storefront-core: State Synchronization for the Storefront
//!
//! The event bus, the three state holders, and order assembly. Nothing in
//! this crate performs I/O; the transport and the presentation live in the
//! crates above it.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Storefront Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 storefront-terminal (presenters)                │   │
//! │  │   header ─ gallery ─ preview ─ basket ─ order ─ contacts ─ modal│   │
//! │  └──────────────▲──────────────────────────────┬───────────────────┘   │
//! │          notifications                      intents                    │
//! │  ┌──────────────┴──────────────────────────────▼───────────────────┐   │
//! │  │              ★ storefront-core (THIS CRATE) ★                   │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │    bus    │  │  catalog  │  │   cart    │  │   buyer   │  │   │
//! │  │   │ EventBus  │  │  Catalog  │  │ CartState │  │BuyerState │  │   │
//! │  │   │StoreEvent │  │   State   │  │CartSnapsh.│  │FieldErrors│  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                         order::build_order                      │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • SYNCHRONOUS DISPATCH                    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 storefront-client (transport)                   │   │
//! │  │              GET /product, POST /order, config                  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`bus`] - Event bus and the event catalog
//! - [`catalog`] - Fetched products and the previewed product
//! - [`cart`] - Basket membership and totals
//! - [`buyer`] - Checkout data entered by the buyer
//! - [`order`] - Order assembly
//! - [`validation`] - Buyer profile validation
//! - [`money`] - Integer money type
//! - [`types`] - Shared domain types
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use storefront_core::{CartState, EventBus, Money, Product, ProductId};
//!
//! let bus = Arc::new(EventBus::new());
//! let cart = CartState::new(Arc::clone(&bus));
//!
//! let lamp = Product {
//!     id: ProductId::new("a"),
//!     title: "Lamp".into(),
//!     description: String::new(),
//!     category: "other".into(),
//!     image: "/lamp.svg".into(),
//!     price: Some(Money::from_units(100)),
//! };
//! cart.add_item(&lamp).unwrap();
//!
//! assert_eq!(cart.get_total_price(), Money::from_units(100));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod bus;
pub mod buyer;
pub mod cart;
pub mod catalog;
pub mod error;
pub mod money;
pub mod order;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use bus::{DispatchReport, EventBus, EventFilter, EventKind, StoreEvent, SubscriptionId};
pub use buyer::{BuyerProfile, BuyerState};
pub use cart::{Cart, CartItem, CartLine, CartSnapshot, CartState};
pub use catalog::CatalogState;
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use order::build_order;
pub use types::*;
pub use validation::FieldErrors;
