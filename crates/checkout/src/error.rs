//! Checkout error types.

use domain::{DraftError, ProductId, ValidationErrors};
use thiserror::Error;

use crate::state::FlowState;

/// Errors that can occur while driving the checkout workflow.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// One or more draft fields are invalid; carries the field→message
    /// mapping so the form can surface it. Recoverable by correcting
    /// input.
    #[error("order form is invalid: {errors}")]
    Validation { errors: ValidationErrors },

    /// The cart holds no line items. Recoverable.
    #[error("cart is empty")]
    EmptyCart,

    /// The transport rejected or failed the submission. Recoverable by
    /// retry; cart and draft are left untouched.
    #[error("order submission failed: {0}")]
    SubmissionFailed(String),

    /// The product source failed; the catalog stays empty. Recoverable
    /// by retry.
    #[error("catalog load failed: {0}")]
    LoadFailed(String),

    /// A submission is already in flight; the trigger was rejected.
    #[error("an order submission is already in flight")]
    SubmissionInFlight,

    /// The workflow is in the wrong state for the requested operation.
    #[error("cannot {action} from {state} state")]
    InvalidState {
        state: FlowState,
        action: &'static str,
    },

    /// The product has no price and cannot be put in the cart.
    #[error("product {0} has no price and cannot be purchased")]
    Unpurchasable(ProductId),
}

impl From<DraftError> for CheckoutError {
    fn from(err: DraftError) -> Self {
        match err {
            DraftError::Invalid(errors) => CheckoutError::Validation { errors },
            DraftError::EmptyCart => CheckoutError::EmptyCart,
        }
    }
}

/// Convenience type alias for checkout results.
pub type Result<T> = std::result::Result<T, CheckoutError>;
