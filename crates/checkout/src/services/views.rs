//! Render collaborator seam.

use std::sync::{Arc, RwLock};

use domain::{DraftData, Money, Product, ProductId, ValidationErrors};

use super::transport::OrderReceipt;

/// Render collaborator the workflow pushes view state into.
///
/// Implementations build whatever displayable unit fits (DOM nodes,
/// console lines, recorded calls); the workflow only hands over plain
/// data. Validity always arrives precomputed: the sink never decides
/// whether a form is ready itself.
pub trait ViewSink: Send + Sync {
    /// Renders the product catalog.
    fn show_catalog(&self, products: &[Product]);

    /// Opens the preview for one product.
    fn show_preview(&self, product: &Product, in_cart: bool, purchasable: bool);

    /// Opens or refreshes the cart view.
    fn show_cart(&self, items: &[Product], total: Money, checkout_enabled: bool);

    /// Opens or refreshes the payment/address step.
    fn show_order_form(&self, draft: &DraftData, errors: &ValidationErrors, ready: bool);

    /// Opens or refreshes the email/phone step.
    fn show_contact_form(&self, draft: &DraftData, errors: &ValidationErrors, ready: bool);

    /// Shows the order-accepted message.
    fn show_success(&self, receipt: &OrderReceipt);

    /// Surfaces a failure message over the current view.
    fn show_failure(&self, message: &str);

    /// Updates the cart counter in the page header.
    fn update_cart_badge(&self, count: usize);

    /// Dismisses whatever modal view is open.
    fn close(&self);
}

/// One recorded render call.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewCall {
    Catalog {
        count: usize,
    },
    Preview {
        id: ProductId,
        in_cart: bool,
        purchasable: bool,
    },
    CartView {
        count: usize,
        total: Money,
        checkout_enabled: bool,
    },
    OrderForm {
        draft: DraftData,
        errors: ValidationErrors,
        ready: bool,
    },
    ContactForm {
        draft: DraftData,
        errors: ValidationErrors,
        ready: bool,
    },
    Success {
        order_id: String,
        total: Money,
    },
    Failure {
        message: String,
    },
    CartBadge {
        count: usize,
    },
    Closed,
}

/// View sink that records every call, for assertions in tests.
#[derive(Clone, Default)]
pub struct RecordingViewSink {
    calls: Arc<RwLock<Vec<ViewCall>>>,
}

impl RecordingViewSink {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all recorded calls in order.
    pub fn calls(&self) -> Vec<ViewCall> {
        self.calls.read().unwrap().clone()
    }

    /// Returns the most recent call.
    pub fn last(&self) -> Option<ViewCall> {
        self.calls.read().unwrap().last().cloned()
    }

    /// Returns the number of recorded calls.
    pub fn len(&self) -> usize {
        self.calls.read().unwrap().len()
    }

    /// Returns true if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.calls.read().unwrap().is_empty()
    }

    /// Forgets all recorded calls.
    pub fn reset(&self) {
        self.calls.write().unwrap().clear();
    }

    /// Returns true if any recorded call satisfies the predicate.
    pub fn any(&self, predicate: impl Fn(&ViewCall) -> bool) -> bool {
        self.calls.read().unwrap().iter().any(|c| predicate(c))
    }

    fn record(&self, call: ViewCall) {
        self.calls.write().unwrap().push(call);
    }
}

impl ViewSink for RecordingViewSink {
    fn show_catalog(&self, products: &[Product]) {
        self.record(ViewCall::Catalog {
            count: products.len(),
        });
    }

    fn show_preview(&self, product: &Product, in_cart: bool, purchasable: bool) {
        self.record(ViewCall::Preview {
            id: product.id.clone(),
            in_cart,
            purchasable,
        });
    }

    fn show_cart(&self, items: &[Product], total: Money, checkout_enabled: bool) {
        self.record(ViewCall::CartView {
            count: items.len(),
            total,
            checkout_enabled,
        });
    }

    fn show_order_form(&self, draft: &DraftData, errors: &ValidationErrors, ready: bool) {
        self.record(ViewCall::OrderForm {
            draft: draft.clone(),
            errors: errors.clone(),
            ready,
        });
    }

    fn show_contact_form(&self, draft: &DraftData, errors: &ValidationErrors, ready: bool) {
        self.record(ViewCall::ContactForm {
            draft: draft.clone(),
            errors: errors.clone(),
            ready,
        });
    }

    fn show_success(&self, receipt: &OrderReceipt) {
        self.record(ViewCall::Success {
            order_id: receipt.order_id.clone(),
            total: receipt.total,
        });
    }

    fn show_failure(&self, message: &str) {
        self.record(ViewCall::Failure {
            message: message.to_string(),
        });
    }

    fn update_cart_badge(&self, count: usize) {
        self.record(ViewCall::CartBadge { count });
    }

    fn close(&self) {
        self.record(ViewCall::Closed);
    }
}
