//! Checkout workflow state machine.

use serde::{Deserialize, Serialize};

/// The state of the checkout workflow.
///
/// State transitions:
/// ```text
/// Idle ──┬──► ProductPreview ──► Idle
///        └──► CartView ──► OrderDetails ──► ContactDetails ──► Submitting
///                                                ▲                │
///                                                └──(rejected)────┤
///                                                                 ▼
///                              Idle ◄──(acknowledged)──────── Success
/// ```
/// Any state returns to `Idle` on explicit close; closing never clears
/// the cart or the draft, so an abandoned checkout can be resumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum FlowState {
    /// Nothing is open; the catalog page is showing.
    #[default]
    Idle,

    /// A product preview modal is open.
    ProductPreview,

    /// The cart modal is open.
    CartView,

    /// The payment/address step of the order form is open.
    OrderDetails,

    /// The email/phone step of the order form is open.
    ContactDetails,

    /// An order submission is in flight with the transport.
    Submitting,

    /// The order was accepted; the success message is showing.
    Success,
}

impl FlowState {
    /// Returns true if a product preview may open in this state.
    pub fn accepts_preview(&self) -> bool {
        matches!(self, FlowState::Idle | FlowState::ProductPreview)
    }

    /// Returns true if the cart view may open in this state.
    pub fn accepts_cart_open(&self) -> bool {
        matches!(self, FlowState::Idle)
    }

    /// Returns true if checkout may be requested in this state.
    pub fn accepts_checkout(&self) -> bool {
        matches!(self, FlowState::CartView)
    }

    /// Returns true if the order step may be submitted in this state.
    pub fn accepts_order_step(&self) -> bool {
        matches!(self, FlowState::OrderDetails)
    }

    /// Returns true if the contact step may be submitted in this state.
    pub fn accepts_contact_step(&self) -> bool {
        matches!(self, FlowState::ContactDetails)
    }

    /// Returns true if one of the two form steps is open.
    pub fn is_form(&self) -> bool {
        matches!(self, FlowState::OrderDetails | FlowState::ContactDetails)
    }

    /// Returns true if a submission is in flight.
    pub fn is_submitting(&self) -> bool {
        matches!(self, FlowState::Submitting)
    }

    /// Returns the state name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            FlowState::Idle => "Idle",
            FlowState::ProductPreview => "ProductPreview",
            FlowState::CartView => "CartView",
            FlowState::OrderDetails => "OrderDetails",
            FlowState::ContactDetails => "ContactDetails",
            FlowState::Submitting => "Submitting",
            FlowState::Success => "Success",
        }
    }
}

impl std::fmt::Display for FlowState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
