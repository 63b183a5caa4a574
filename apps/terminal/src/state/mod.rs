//! # State Module
//!
//! App-level state that is not owned by a `storefront-core` state holder.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  storefront-core      CatalogState, CartState, BuyerState (bus-attached)│
//! │  this module          ConfigState (read-only after startup)             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;

pub use config::ConfigState;
