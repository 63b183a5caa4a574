//! # Surface
//!
//! The latest rendered element of every region, plus which modal screen is
//! open.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ Header                                       │
//! ├──────────────────────────────────────────────┤
//! │ Gallery                                      │
//! ├──────────────────────────────────────────────┤
//! │ Modal (only when open)                       │
//! │   ModalFrame + one of:                       │
//! │   Preview | Basket | OrderForm | Contacts |  │
//! │   Success                                    │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! Every write bumps a version counter published through a
//! `tokio::sync::watch` channel; the shell redraws when it changes.

use std::collections::HashMap;
use std::fmt::Write as _;

use parking_lot::RwLock;
use storefront_core::BuyerField;
use tokio::sync::watch;

use crate::views::{Control, Element};

/// Screens shown inside the modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModalScreen {
    Preview,
    Basket,
    OrderForm,
    Contacts,
    Success,
}

/// Where a presenter renders to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Header,
    Gallery,
    ModalFrame,
    Screen(ModalScreen),
}

#[derive(Debug, Default)]
struct Regions {
    elements: HashMap<Slot, Element>,
    modal: Option<ModalScreen>,
}

/// Shared render target.
#[derive(Debug)]
pub struct Surface {
    regions: RwLock<Regions>,
    version: watch::Sender<u64>,
}

impl Surface {
    pub fn new() -> Self {
        let (version, _) = watch::channel(0);
        Surface {
            regions: RwLock::new(Regions::default()),
            version,
        }
    }

    /// Receiver that changes whenever anything is re-rendered.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.version.subscribe()
    }

    pub fn version(&self) -> u64 {
        *self.version.borrow()
    }

    fn bump(&self) {
        self.version.send_modify(|v| *v += 1);
    }

    /// Replaces the element of one slot.
    pub fn set(&self, slot: Slot, element: Element) {
        self.regions.write().elements.insert(slot, element);
        self.bump();
    }

    pub fn get(&self, slot: Slot) -> Option<Element> {
        self.regions.read().elements.get(&slot).cloned()
    }

    pub fn open_modal(&self, screen: ModalScreen) {
        self.regions.write().modal = Some(screen);
        self.bump();
    }

    pub fn close_modal(&self) {
        let was_open = self.regions.write().modal.take().is_some();
        if was_open {
            self.bump();
        }
    }

    pub fn modal(&self) -> Option<ModalScreen> {
        self.regions.read().modal
    }

    /// Elements currently on screen, top to bottom.
    pub fn visible(&self) -> Vec<Element> {
        let regions = self.regions.read();
        let mut slots = vec![Slot::Header, Slot::Gallery];
        if let Some(screen) = regions.modal {
            slots.push(Slot::ModalFrame);
            slots.push(Slot::Screen(screen));
        }
        slots
            .into_iter()
            .filter_map(|slot| regions.elements.get(&slot).cloned())
            .collect()
    }

    /// Finds a visible button. The modal wins over the page behind it.
    pub fn find_button(&self, key: &str) -> Option<Control> {
        self.visible()
            .iter()
            .rev()
            .find_map(|element| element.button(key).cloned())
    }

    /// Finds a visible input for `field`.
    pub fn find_input(&self, field: BuyerField) -> Option<Control> {
        self.visible()
            .iter()
            .rev()
            .find_map(|element| element.input(field).cloned())
    }

    /// Plain-text rendering of everything visible.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let visible = self.visible();
        let page_len = visible.len().min(2);
        for (i, element) in visible.iter().enumerate() {
            if i == page_len {
                out.push_str("-------------------------------------------\n");
            }
            let _ = write!(out, "{}", element);
        }
        out
    }
}

impl Default for Surface {
    fn default() -> Self {
        Self::new()
    }
}
