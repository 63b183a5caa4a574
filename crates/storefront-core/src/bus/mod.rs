//! # Event Bus Module
//!
//! The publish/subscribe router between intent producers, state holders and
//! presenters.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  shell/control ──► publish(intent) ──► state holder mutates             │
//! │                                             │                           │
//! │                                             ▼                           │
//! │                              publish(notification)   (nested call)      │
//! │                                             │                           │
//! │                                             ▼                           │
//! │                        presenter pulls snapshot, re-renders             │
//! │                                                                         │
//! │  Everything above completes before the first publish returns.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use storefront_core::bus::{EventBus, EventKind, StoreEvent};
//!
//! let bus = Arc::new(EventBus::new());
//! bus.subscribe(EventKind::CartChanged, |event| {
//!     println!("{}", event.name());
//!     Ok(())
//! });
//!
//! let report = bus.publish(StoreEvent::CartChanged);
//! assert_eq!(report.delivered, 1);
//! ```

mod bus;
mod events;

pub use bus::*;
pub use events::*;
