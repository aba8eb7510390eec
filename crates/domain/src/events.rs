//! The tagged event type carried by the bus.
//!
//! One enum covers both directions of the flow: UI intents travel into
//! the models, model notifications travel out to the presenter. Every
//! variant has a fixed payload type; there is no untyped dispatch.

use broker::BusEvent;
use serde::{Deserialize, Serialize};

use crate::catalog::Product;
use crate::draft::DraftField;
use crate::value_objects::{Money, PaymentMethod, ProductId};

/// Events published over the storefront bus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum StoreEvent {
    // Model notifications
    /// The catalog was replaced wholesale from the product source.
    CatalogLoaded { count: usize },

    /// A product became the currently inspected one.
    ProductSelected { product: Product },

    /// The inspected-product reference was cleared.
    SelectionCleared,

    /// The cart contents changed; carries the full snapshot.
    CartChanged { items: Vec<Product>, total: Money },

    /// One order-draft field was overwritten.
    DraftFieldChanged { field: DraftField },

    /// The order draft was reset to empty.
    DraftCleared,

    // UI intents
    /// A catalog card was activated.
    ProductCardClicked { id: ProductId },

    /// The add-to-cart action was activated in the preview.
    AddToCartClicked { id: ProductId },

    /// A remove-from-cart action was activated (preview or cart row).
    RemoveFromCartClicked { id: ProductId },

    /// The header cart icon was activated.
    CartIconClicked,

    /// The checkout button in the cart view was activated.
    CheckoutClicked,

    /// A payment method was picked on the order step.
    PaymentInput { method: PaymentMethod },

    /// The address field changed on the order step.
    AddressInput { address: String },

    /// The email field changed on the contact step.
    EmailInput { email: String },

    /// The phone field changed on the contact step.
    PhoneInput { phone: String },

    /// The order step form was submitted.
    OrderStepSubmitted {
        payment: PaymentMethod,
        address: String,
    },

    /// The contact step form was submitted.
    ContactStepSubmitted { email: String, phone: String },

    /// The current modal view was dismissed.
    ViewClosed,

    /// The success message was acknowledged.
    SuccessAcknowledged,
}

/// Discriminants of [`StoreEvent`], used for subscription routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StoreEventKind {
    CatalogLoaded,
    ProductSelected,
    SelectionCleared,
    CartChanged,
    DraftFieldChanged,
    DraftCleared,
    ProductCardClicked,
    AddToCartClicked,
    RemoveFromCartClicked,
    CartIconClicked,
    CheckoutClicked,
    PaymentInput,
    AddressInput,
    EmailInput,
    PhoneInput,
    OrderStepSubmitted,
    ContactStepSubmitted,
    ViewClosed,
    SuccessAcknowledged,
}

impl StoreEventKind {
    /// Returns the kind name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreEventKind::CatalogLoaded => "CatalogLoaded",
            StoreEventKind::ProductSelected => "ProductSelected",
            StoreEventKind::SelectionCleared => "SelectionCleared",
            StoreEventKind::CartChanged => "CartChanged",
            StoreEventKind::DraftFieldChanged => "DraftFieldChanged",
            StoreEventKind::DraftCleared => "DraftCleared",
            StoreEventKind::ProductCardClicked => "ProductCardClicked",
            StoreEventKind::AddToCartClicked => "AddToCartClicked",
            StoreEventKind::RemoveFromCartClicked => "RemoveFromCartClicked",
            StoreEventKind::CartIconClicked => "CartIconClicked",
            StoreEventKind::CheckoutClicked => "CheckoutClicked",
            StoreEventKind::PaymentInput => "PaymentInput",
            StoreEventKind::AddressInput => "AddressInput",
            StoreEventKind::EmailInput => "EmailInput",
            StoreEventKind::PhoneInput => "PhoneInput",
            StoreEventKind::OrderStepSubmitted => "OrderStepSubmitted",
            StoreEventKind::ContactStepSubmitted => "ContactStepSubmitted",
            StoreEventKind::ViewClosed => "ViewClosed",
            StoreEventKind::SuccessAcknowledged => "SuccessAcknowledged",
        }
    }
}

impl std::fmt::Display for StoreEventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl BusEvent for StoreEvent {
    type Kind = StoreEventKind;

    fn kind(&self) -> StoreEventKind {
        match self {
            StoreEvent::CatalogLoaded { .. } => StoreEventKind::CatalogLoaded,
            StoreEvent::ProductSelected { .. } => StoreEventKind::ProductSelected,
            StoreEvent::SelectionCleared => StoreEventKind::SelectionCleared,
            StoreEvent::CartChanged { .. } => StoreEventKind::CartChanged,
            StoreEvent::DraftFieldChanged { .. } => StoreEventKind::DraftFieldChanged,
            StoreEvent::DraftCleared => StoreEventKind::DraftCleared,
            StoreEvent::ProductCardClicked { .. } => StoreEventKind::ProductCardClicked,
            StoreEvent::AddToCartClicked { .. } => StoreEventKind::AddToCartClicked,
            StoreEvent::RemoveFromCartClicked { .. } => StoreEventKind::RemoveFromCartClicked,
            StoreEvent::CartIconClicked => StoreEventKind::CartIconClicked,
            StoreEvent::CheckoutClicked => StoreEventKind::CheckoutClicked,
            StoreEvent::PaymentInput { .. } => StoreEventKind::PaymentInput,
            StoreEvent::AddressInput { .. } => StoreEventKind::AddressInput,
            StoreEvent::EmailInput { .. } => StoreEventKind::EmailInput,
            StoreEvent::PhoneInput { .. } => StoreEventKind::PhoneInput,
            StoreEvent::OrderStepSubmitted { .. } => StoreEventKind::OrderStepSubmitted,
            StoreEvent::ContactStepSubmitted { .. } => StoreEventKind::ContactStepSubmitted,
            StoreEvent::ViewClosed => StoreEventKind::ViewClosed,
            StoreEvent::SuccessAcknowledged => StoreEventKind::SuccessAcknowledged,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_matches_variant() {
        let event = StoreEvent::CartIconClicked;
        assert_eq!(event.kind(), StoreEventKind::CartIconClicked);

        let event = StoreEvent::DraftFieldChanged {
            field: DraftField::Email,
        };
        assert_eq!(event.kind(), StoreEventKind::DraftFieldChanged);
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(StoreEventKind::CartChanged.to_string(), "CartChanged");
        assert_eq!(
            StoreEventKind::SuccessAcknowledged.to_string(),
            "SuccessAcknowledged"
        );
    }

    #[test]
    fn test_event_serialization_roundtrip() {
        let event = StoreEvent::OrderStepSubmitted {
            payment: PaymentMethod::Card,
            address: "10 Main St".to_string(),
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: StoreEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
