//! Console render collaborator.

use checkout::{OrderReceipt, ViewSink};
use domain::{DraftData, Money, Product, ValidationErrors};

/// View sink that renders everything as log lines.
///
/// Stands in for the browser views; the workflow hands it the same data
/// it would hand a DOM renderer.
pub struct ConsoleView;

impl ViewSink for ConsoleView {
    fn show_catalog(&self, products: &[Product]) {
        tracing::info!(count = products.len(), "view: catalog");
        for product in products {
            let price = product
                .price
                .map(|p| p.to_string())
                .unwrap_or_else(|| "priceless".to_string());
            tracing::info!(id = %product.id, title = %product.title, %price, "view: catalog entry");
        }
    }

    fn show_preview(&self, product: &Product, in_cart: bool, purchasable: bool) {
        tracing::info!(
            id = %product.id,
            title = %product.title,
            in_cart,
            purchasable,
            "view: product preview"
        );
    }

    fn show_cart(&self, items: &[Product], total: Money, checkout_enabled: bool) {
        tracing::info!(count = items.len(), %total, checkout_enabled, "view: cart");
    }

    fn show_order_form(&self, draft: &DraftData, errors: &ValidationErrors, ready: bool) {
        tracing::info!(
            payment = ?draft.payment,
            address = %draft.address,
            errors = %errors,
            ready,
            "view: order form"
        );
    }

    fn show_contact_form(&self, draft: &DraftData, errors: &ValidationErrors, ready: bool) {
        tracing::info!(
            email = %draft.email,
            phone = %draft.phone,
            errors = %errors,
            ready,
            "view: contact form"
        );
    }

    fn show_success(&self, receipt: &OrderReceipt) {
        tracing::info!(order_id = %receipt.order_id, total = %receipt.total, "view: order accepted");
    }

    fn show_failure(&self, message: &str) {
        tracing::warn!(message, "view: failure");
    }

    fn update_cart_badge(&self, count: usize) {
        tracing::info!(count, "view: cart badge");
    }

    fn close(&self) {
        tracing::info!("view: modal closed");
    }
}
