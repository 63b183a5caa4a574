//! # Buyer Profile State
//!
//! The checkout data collected across the two form steps.
//!
//! ```text
//! buyer:edit{field,value} ──► BuyerState::set_field ──► buyer:changed(snapshot)
//! (success path)              BuyerState::clear     ──► buyer:cleared
//! ```
//!
//! Validity is never stored. Callers ask for it with [`BuyerState::validate`]
//! when they need it.

use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use ts_rs::TS;

use crate::bus::{EventBus, EventKind, StoreEvent, SubscriptionId};
use crate::error::ValidationError;
use crate::types::{BuyerField, PaymentMethod};
use crate::validation::{normalize_text, validate_profile, FieldErrors};

/// Snapshot of what the buyer has entered so far. `None` means unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BuyerProfile {
    pub payment: Option<PaymentMethod>,
    pub address: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl BuyerProfile {
    /// Applies raw input to one field.
    ///
    /// Text is trimmed and blank input unsets the field. A payment value
    /// outside the allowed set is rejected and the profile is left as is.
    pub fn apply(&mut self, field: BuyerField, value: &str) -> Result<(), ValidationError> {
        match field {
            BuyerField::Payment => {
                self.payment = match normalize_text(value) {
                    Some(raw) => Some(raw.parse()?),
                    None => None,
                };
            }
            BuyerField::Address => self.address = normalize_text(value),
            BuyerField::Email => self.email = normalize_text(value),
            BuyerField::Phone => self.phone = normalize_text(value),
        }
        Ok(())
    }

    pub fn unset(&mut self, field: BuyerField) {
        match field {
            BuyerField::Payment => self.payment = None,
            BuyerField::Address => self.address = None,
            BuyerField::Email => self.email = None,
            BuyerField::Phone => self.phone = None,
        }
    }

    /// Current value of a field as display text.
    pub fn get(&self, field: BuyerField) -> Option<String> {
        match field {
            BuyerField::Payment => self.payment.map(|m| m.to_string()),
            BuyerField::Address => self.address.clone(),
            BuyerField::Email => self.email.clone(),
            BuyerField::Phone => self.phone.clone(),
        }
    }

    pub fn is_set(&self, field: BuyerField) -> bool {
        match field {
            BuyerField::Payment => self.payment.is_some(),
            BuyerField::Address => self.address.is_some(),
            BuyerField::Email => self.email.is_some(),
            BuyerField::Phone => self.phone.is_some(),
        }
    }

    /// Unset fields, in form order.
    pub fn missing_fields(&self) -> Vec<BuyerField> {
        BuyerField::ALL
            .into_iter()
            .filter(|field| !self.is_set(*field))
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        BuyerField::ALL.iter().all(|field| self.is_set(*field))
    }
}

/// Bus-attached buyer profile holder.
#[derive(Debug)]
pub struct BuyerState {
    bus: Arc<EventBus>,
    profile: RwLock<BuyerProfile>,
}

impl BuyerState {
    pub fn new(bus: Arc<EventBus>) -> Self {
        BuyerState {
            bus,
            profile: RwLock::new(BuyerProfile::default()),
        }
    }

    /// Subscribes to `buyer:edit`.
    pub fn connect(self: &Arc<Self>) -> Vec<SubscriptionId> {
        let weak = Arc::downgrade(self);
        let edit = self.bus.subscribe(EventKind::BuyerFieldEdited, move |event| {
            if let (Some(buyer), StoreEvent::BuyerFieldEdited { field, value }) =
                (weak.upgrade(), event)
            {
                buyer.set_field(*field, value)?;
            }
            Ok(())
        });
        vec![edit]
    }

    /// Sets one field from raw input and publishes the whole profile.
    ///
    /// Rejected input changes nothing and publishes nothing.
    pub fn set_field(&self, field: BuyerField, value: &str) -> Result<(), ValidationError> {
        let snapshot = {
            let mut profile = self.profile.write();
            if let Err(err) = profile.apply(field, value) {
                warn!(%field, error = %err, "Rejected buyer input");
                return Err(err);
            }
            profile.clone()
        };
        debug!(%field, "Buyer field updated");
        self.bus.publish(StoreEvent::ProfileChanged(snapshot));
        Ok(())
    }

    pub fn set_payment(&self, method: PaymentMethod) {
        let snapshot = {
            let mut profile = self.profile.write();
            profile.payment = Some(method);
            profile.clone()
        };
        self.bus.publish(StoreEvent::ProfileChanged(snapshot));
    }

    pub fn get_data(&self) -> BuyerProfile {
        self.profile.read().clone()
    }

    /// Resets every field for the next order.
    pub fn clear(&self) {
        *self.profile.write() = BuyerProfile::default();
        debug!("Buyer profile cleared");
        self.bus.publish(StoreEvent::ProfileCleared);
    }

    pub fn validate(&self) -> FieldErrors {
        validate_profile(&self.profile.read())
    }

    pub fn is_valid(&self) -> bool {
        self.profile.read().is_complete()
    }
}
