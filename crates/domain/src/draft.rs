//! Order draft model and field validation.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use broker::EventBus;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cart::Cart;
use crate::events::StoreEvent;
use crate::value_objects::{Money, PaymentMethod, ProductId};

/// The four fields of the order draft.
///
/// Declaration order doubles as the presentation order of validation
/// messages.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum DraftField {
    /// Payment method selector on the order step.
    Payment,

    /// Delivery address on the order step.
    Address,

    /// Email on the contact step.
    Email,

    /// Phone on the contact step.
    Phone,
}

impl DraftField {
    /// Returns the field name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            DraftField::Payment => "payment",
            DraftField::Address => "address",
            DraftField::Email => "email",
            DraftField::Phone => "phone",
        }
    }
}

impl std::fmt::Display for DraftField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Field → message mapping, containing an entry only for fields that are
/// currently invalid. An empty mapping means the draft is valid.
///
/// Derived on demand from the draft, never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<DraftField, String>);

impl ValidationErrors {
    /// Creates an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a message for a field.
    pub fn insert(&mut self, field: DraftField, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    /// Returns true if no field is invalid.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of invalid fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns the message for a field, if it is invalid.
    pub fn message(&self, field: DraftField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    /// Returns true if the field is invalid.
    pub fn contains(&self, field: DraftField) -> bool {
        self.0.contains_key(&field)
    }

    /// Returns the subset of errors for the given fields.
    ///
    /// Used by the workflow to push step-scoped errors: the order step
    /// sees only payment/address, the contact step only email/phone.
    pub fn only(&self, fields: &[DraftField]) -> ValidationErrors {
        ValidationErrors(
            self.0
                .iter()
                .filter(|(field, _)| fields.contains(field))
                .map(|(field, message)| (*field, message.clone()))
                .collect(),
        )
    }

    /// Iterates over the invalid fields in field order.
    pub fn iter(&self) -> impl Iterator<Item = (DraftField, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let joined = self
            .0
            .values()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "{joined}")
    }
}

/// A plain copy of the draft fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DraftData {
    /// Chosen payment method, unset until picked.
    pub payment: Option<PaymentMethod>,

    /// Email address.
    pub email: String,

    /// Phone number.
    pub phone: String,

    /// Delivery address.
    pub address: String,
}

/// The assembled order, built only at submission time.
///
/// Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
    /// Chosen payment method.
    pub payment: PaymentMethod,

    /// Email address.
    pub email: String,

    /// Phone number.
    pub phone: String,

    /// Delivery address.
    pub address: String,

    /// Cart total at assembly time.
    pub total: Money,

    /// Product ids of the cart line items, in cart order.
    pub items: Vec<ProductId>,
}

/// Errors raised when assembling an order request.
#[derive(Debug, Error)]
pub enum DraftError {
    /// One or more draft fields are invalid.
    #[error("draft is invalid: {0}")]
    Invalid(ValidationErrors),

    /// The cart holds no line items.
    #[error("cart is empty")]
    EmptyCart,
}

const MSG_PAYMENT: &str = "no payment method selected";
const MSG_ADDRESS: &str = "delivery address required";
const MSG_EMAIL: &str = "email required";
const MSG_PHONE: &str = "phone required";

/// Transient checkout form state.
///
/// Fields are overwritten one at a time by UI input; each setter
/// publishes a change notification scoped to its field so views can
/// refresh selectively. The draft is never persisted.
#[derive(Clone)]
pub struct OrderDraft {
    bus: EventBus<StoreEvent>,
    data: Arc<RwLock<DraftData>>,
}

impl OrderDraft {
    /// Creates an empty draft publishing to the given bus.
    pub fn new(bus: EventBus<StoreEvent>) -> Self {
        Self {
            bus,
            data: Arc::new(RwLock::new(DraftData::default())),
        }
    }

    /// Overwrites the payment method.
    pub fn set_payment(&self, method: PaymentMethod) {
        self.data.write().unwrap().payment = Some(method);
        self.publish_changed(DraftField::Payment);
    }

    /// Overwrites the delivery address.
    pub fn set_address(&self, address: impl Into<String>) {
        self.data.write().unwrap().address = address.into();
        self.publish_changed(DraftField::Address);
    }

    /// Overwrites the email address.
    pub fn set_email(&self, email: impl Into<String>) {
        self.data.write().unwrap().email = email.into();
        self.publish_changed(DraftField::Email);
    }

    /// Overwrites the phone number.
    pub fn set_phone(&self, phone: impl Into<String>) {
        self.data.write().unwrap().phone = phone.into();
        self.publish_changed(DraftField::Phone);
    }

    /// Resets all four fields to empty and publishes `DraftCleared`.
    pub fn clear(&self) {
        *self.data.write().unwrap() = DraftData::default();
        self.bus.publish(StoreEvent::DraftCleared);
    }

    /// Returns a copy of the current fields.
    pub fn snapshot(&self) -> DraftData {
        self.data.read().unwrap().clone()
    }

    /// Validates the current fields.
    ///
    /// Every rule is checked on every call; nothing short-circuits.
    /// Format validation (email/phone shape) is out of scope.
    pub fn validate(&self) -> ValidationErrors {
        Self::validate_data(&self.data.read().unwrap())
    }

    fn validate_data(data: &DraftData) -> ValidationErrors {
        let mut errors = ValidationErrors::new();

        if data.payment.is_none() {
            errors.insert(DraftField::Payment, MSG_PAYMENT);
        }
        if data.address.trim().is_empty() {
            errors.insert(DraftField::Address, MSG_ADDRESS);
        }
        if data.email.trim().is_empty() {
            errors.insert(DraftField::Email, MSG_EMAIL);
        }
        if data.phone.trim().is_empty() {
            errors.insert(DraftField::Phone, MSG_PHONE);
        }

        errors
    }

    /// Assembles an immutable order request from the draft and the cart.
    ///
    /// The single gate through which submission is allowed: the draft
    /// must validate clean and the cart must be non-empty, checked in
    /// that order at the moment of the call.
    pub fn build_request(&self, cart: &Cart) -> Result<OrderRequest, DraftError> {
        let data = self.data.read().unwrap().clone();

        let errors = Self::validate_data(&data);
        let payment = match data.payment {
            Some(method) if errors.is_empty() => method,
            _ => return Err(DraftError::Invalid(errors)),
        };

        if cart.is_empty() {
            return Err(DraftError::EmptyCart);
        }

        Ok(OrderRequest {
            payment,
            email: data.email,
            phone: data.phone,
            address: data.address,
            total: cart.total(),
            items: cart.items().into_iter().map(|p| p.id).collect(),
        })
    }

    fn publish_changed(&self, field: DraftField) {
        self.bus.publish(StoreEvent::DraftFieldChanged { field });
    }
}
