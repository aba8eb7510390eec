//! Checkout workflow for the storefront.
//!
//! This crate orchestrates the multi-step checkout over the domain
//! models:
//! 1. Browse and preview products
//! 2. Collect a cart
//! 3. Payment/address step, then email/phone step
//! 4. Submit through the order transport
//!
//! The workflow is a state machine fed events from the bus; it computes
//! form validity itself and drives an opaque render collaborator. The
//! submission gate re-checks draft and cart at the moment of submission,
//! allows exactly one in-flight attempt, and discards results that
//! arrive after the workflow was reset.

pub mod bootstrap;
pub mod error;
pub mod flow;
pub mod pump;
pub mod services;
pub mod state;

pub use bootstrap::Storefront;
pub use error::CheckoutError;
pub use flow::{AttemptId, CheckoutFlow};
pub use pump::EventPump;
pub use services::{
    InMemoryOrderTransport, InMemoryProductSource, OrderReceipt, OrderTransport, ProductSource,
    RecordingViewSink, ViewCall, ViewSink,
};
pub use state::FlowState;
