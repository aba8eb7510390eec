//! Checkout workflow presenter.

use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use domain::{
    Cart, Catalog, DraftField, Money, OrderDraft, PaymentMethod, Product, ProductId, StoreEvent,
};
use uuid::Uuid;

use crate::error::CheckoutError;
use crate::services::{OrderTransport, ProductSource, ViewSink};
use crate::state::FlowState;

/// Fields surfaced on the payment/address step.
const ORDER_STEP_FIELDS: &[DraftField] = &[DraftField::Payment, DraftField::Address];

/// Fields surfaced on the email/phone step.
const CONTACT_STEP_FIELDS: &[DraftField] = &[DraftField::Email, DraftField::Phone];

/// Identifier stamped on a submission attempt.
///
/// A late transport result is applied only if its stamp still matches
/// the workflow's current attempt; otherwise it is discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttemptId(Uuid);

impl AttemptId {
    /// Creates a new random attempt ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for AttemptId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for AttemptId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy)]
struct SubmissionAttempt {
    id: AttemptId,
    started_at: DateTime<Utc>,
}

impl SubmissionAttempt {
    fn new() -> Self {
        Self {
            id: AttemptId::new(),
            started_at: Utc::now(),
        }
    }
}

#[derive(Debug, Default)]
struct FlowInner {
    state: FlowState,
    attempt: Option<AttemptId>,
}

/// Orchestrates state transitions across catalog, cart, and draft.
///
/// The flow reacts to UI intents and model notifications, drives the
/// render collaborator, and owns the only gate through which an order
/// reaches the transport. All methods take `&self`; share the flow via
/// `Arc` and feed it events one at a time.
pub struct CheckoutFlow<P, T, V>
where
    P: ProductSource,
    T: OrderTransport,
    V: ViewSink,
{
    catalog: Catalog,
    cart: Cart,
    draft: OrderDraft,
    products: P,
    transport: T,
    view: V,
    inner: Arc<RwLock<FlowInner>>,
}

impl<P, T, V> CheckoutFlow<P, T, V>
where
    P: ProductSource,
    T: OrderTransport,
    V: ViewSink,
{
    /// Creates a new flow over the given models and collaborators.
    pub fn new(
        catalog: Catalog,
        cart: Cart,
        draft: OrderDraft,
        products: P,
        transport: T,
        view: V,
    ) -> Self {
        Self {
            catalog,
            cart,
            draft,
            products,
            transport,
            view,
            inner: Arc::new(RwLock::new(FlowInner::default())),
        }
    }

    /// Returns the current workflow state.
    pub fn state(&self) -> FlowState {
        self.inner.read().unwrap().state
    }

    /// Fetches the product list and replaces the catalog.
    ///
    /// On failure the catalog stays empty and a message is surfaced;
    /// the caller may retry.
    #[tracing::instrument(skip(self))]
    pub async fn load_catalog(&self) -> Result<(), CheckoutError> {
        metrics::counter!("catalog_loads_total").increment(1);

        match self.products.fetch_products().await {
            Ok(products) => {
                tracing::info!(count = products.len(), "catalog loaded");
                self.catalog.set_products(products);
                Ok(())
            }
            Err(err) => {
                metrics::counter!("catalog_load_failures").increment(1);
                tracing::error!(%err, "catalog load failed");
                self.view.show_failure(&err.to_string());
                Err(err)
            }
        }
    }

    /// Dispatches one event through the workflow.
    ///
    /// Ignored events (wrong state, unknown ids) return `Ok`; refused
    /// gates and collaborator failures return the error after surfacing
    /// it to the view.
    #[tracing::instrument(skip(self, event), fields(kind = %broker::BusEvent::kind(event)))]
    pub async fn on_event(&self, event: &StoreEvent) -> Result<(), CheckoutError> {
        match event {
            // Model notifications
            StoreEvent::CatalogLoaded { .. } => {
                self.view.show_catalog(&self.catalog.products());
                Ok(())
            }
            StoreEvent::ProductSelected { product } => self.open_preview(product),
            StoreEvent::SelectionCleared => Ok(()),
            StoreEvent::CartChanged { items, total } => self.on_cart_changed(items, *total),
            StoreEvent::DraftFieldChanged { .. } | StoreEvent::DraftCleared => {
                self.refresh_open_form();
                Ok(())
            }

            // UI intents
            StoreEvent::ProductCardClicked { id } => {
                self.catalog.select(id);
                Ok(())
            }
            StoreEvent::AddToCartClicked { id } => self.add_to_cart(id),
            StoreEvent::RemoveFromCartClicked { id } => self.remove_from_cart(id),
            StoreEvent::CartIconClicked => self.open_cart(),
            StoreEvent::CheckoutClicked => self.begin_checkout(),
            StoreEvent::PaymentInput { method } => {
                self.draft.set_payment(*method);
                Ok(())
            }
            StoreEvent::AddressInput { address } => {
                self.draft.set_address(address.clone());
                Ok(())
            }
            StoreEvent::EmailInput { email } => {
                self.draft.set_email(email.clone());
                Ok(())
            }
            StoreEvent::PhoneInput { phone } => {
                self.draft.set_phone(phone.clone());
                Ok(())
            }
            StoreEvent::OrderStepSubmitted { payment, address } => {
                self.submit_order_step(*payment, address)
            }
            StoreEvent::ContactStepSubmitted { email, phone } => {
                self.submit_contact_step(email, phone).await
            }
            StoreEvent::ViewClosed => {
                self.close();
                Ok(())
            }
            StoreEvent::SuccessAcknowledged => {
                self.acknowledge_success();
                Ok(())
            }
        }
    }

    /// Re-runs the submission gate and hands the order to the transport.
    ///
    /// Exactly one submission can be in flight: a second trigger is
    /// rejected with `SubmissionInFlight` before it reaches the
    /// transport. A result arriving after the workflow was reset is
    /// discarded.
    #[tracing::instrument(skip(self))]
    pub async fn submit(&self) -> Result<(), CheckoutError> {
        metrics::counter!("checkout_submissions_total").increment(1);
        let started = std::time::Instant::now();

        let gate = {
            let mut inner = self.inner.write().unwrap();
            if inner.state.is_submitting() {
                metrics::counter!("checkout_double_submits_rejected").increment(1);
                Err(CheckoutError::SubmissionInFlight)
            } else if !inner.state.accepts_contact_step() {
                Err(CheckoutError::InvalidState {
                    state: inner.state,
                    action: "submit order",
                })
            } else {
                match self.draft.build_request(&self.cart) {
                    Ok(request) => {
                        let attempt = SubmissionAttempt::new();
                        inner.state = FlowState::Submitting;
                        inner.attempt = Some(attempt.id);
                        Ok((request, attempt))
                    }
                    Err(err) => Err(CheckoutError::from(err)),
                }
            }
        };

        let (request, attempt) = match gate {
            Ok(pair) => pair,
            Err(err) => {
                tracing::warn!(%err, "submission refused");
                self.view.show_failure(&err.to_string());
                return Err(err);
            }
        };

        tracing::info!(
            attempt = %attempt.id,
            started_at = %attempt.started_at,
            total = %request.total,
            items = request.items.len(),
            "submitting order"
        );

        let result = self.transport.submit_order(&request).await;

        let mut inner = self.inner.write().unwrap();
        if inner.attempt != Some(attempt.id) {
            // Workflow was reset while the call was outstanding.
            metrics::counter!("checkout_stale_results_discarded").increment(1);
            tracing::warn!(attempt = %attempt.id, "discarding stale submission result");
            return Ok(());
        }
        inner.attempt = None;

        match result {
            Ok(receipt) => {
                inner.state = FlowState::Success;
                drop(inner);

                metrics::counter!("checkout_submissions_succeeded").increment(1);
                metrics::histogram!("checkout_submission_duration_seconds")
                    .record(started.elapsed().as_secs_f64());
                tracing::info!(order_id = %receipt.order_id, "order accepted");

                self.view.show_success(&receipt);
                Ok(())
            }
            Err(err) => {
                // Cart and draft stay untouched so the user can retry.
                inner.state = FlowState::ContactDetails;
                drop(inner);

                metrics::counter!("checkout_submissions_failed").increment(1);
                tracing::warn!(%err, "order submission failed");

                self.view
                    .show_failure("order submission failed, please try again");
                self.push_contact_form();
                Err(err)
            }
        }
    }

    fn open_preview(&self, product: &Product) -> Result<(), CheckoutError> {
        {
            let mut inner = self.inner.write().unwrap();
            if !inner.state.accepts_preview() {
                tracing::debug!(state = %inner.state, "preview ignored");
                return Ok(());
            }
            inner.state = FlowState::ProductPreview;
        }
        self.view
            .show_preview(product, self.cart.has(&product.id), product.purchasable());
        Ok(())
    }

    fn add_to_cart(&self, id: &ProductId) -> Result<(), CheckoutError> {
        let Some(product) = self.catalog.product(id) else {
            tracing::debug!(%id, "add ignored: unknown product");
            return Ok(());
        };

        if !product.purchasable() {
            tracing::warn!(%id, "add refused: product has no price");
            return Err(CheckoutError::Unpurchasable(id.clone()));
        }

        self.cart.add(product);
        self.close_preview_if_open();
        Ok(())
    }

    fn remove_from_cart(&self, id: &ProductId) -> Result<(), CheckoutError> {
        self.cart.remove(id);
        self.close_preview_if_open();
        Ok(())
    }

    fn close_preview_if_open(&self) {
        let closed = {
            let mut inner = self.inner.write().unwrap();
            if inner.state == FlowState::ProductPreview {
                inner.state = FlowState::Idle;
                true
            } else {
                false
            }
        };
        if closed {
            self.view.close();
        }
    }

    fn open_cart(&self) -> Result<(), CheckoutError> {
        {
            let mut inner = self.inner.write().unwrap();
            if !inner.state.accepts_cart_open() {
                tracing::debug!(state = %inner.state, "cart open ignored");
                return Ok(());
            }
            inner.state = FlowState::CartView;
        }
        let items = self.cart.items();
        let total = self.cart.total();
        self.view.show_cart(&items, total, !items.is_empty());
        Ok(())
    }

    fn on_cart_changed(&self, items: &[Product], total: Money) -> Result<(), CheckoutError> {
        self.view.update_cart_badge(items.len());
        if self.state() == FlowState::CartView {
            self.view.show_cart(items, total, !items.is_empty());
        }
        Ok(())
    }

    fn begin_checkout(&self) -> Result<(), CheckoutError> {
        {
            let mut inner = self.inner.write().unwrap();
            if !inner.state.accepts_checkout() {
                tracing::debug!(state = %inner.state, "checkout ignored");
                return Ok(());
            }
            if self.cart.is_empty() {
                return Err(CheckoutError::EmptyCart);
            }
            inner.state = FlowState::OrderDetails;
        }
        self.push_order_form();
        Ok(())
    }

    fn submit_order_step(
        &self,
        payment: PaymentMethod,
        address: &str,
    ) -> Result<(), CheckoutError> {
        if !self.state().accepts_order_step() {
            tracing::debug!(state = %self.state(), "order step ignored");
            return Ok(());
        }

        self.draft.set_payment(payment);
        self.draft.set_address(address);

        let errors = self.draft.validate().only(ORDER_STEP_FIELDS);
        if errors.is_empty() {
            self.inner.write().unwrap().state = FlowState::ContactDetails;
            self.push_contact_form();
        } else {
            self.push_order_form();
        }
        Ok(())
    }

    async fn submit_contact_step(&self, email: &str, phone: &str) -> Result<(), CheckoutError> {
        if !self.state().accepts_contact_step() {
            tracing::debug!(state = %self.state(), "contact step ignored");
            return Ok(());
        }

        self.draft.set_email(email);
        self.draft.set_phone(phone);

        let errors = self.draft.validate().only(CONTACT_STEP_FIELDS);
        if !errors.is_empty() {
            self.push_contact_form();
            return Ok(());
        }

        self.submit().await
    }

    /// Re-validates and pushes the step that is currently open, if any.
    ///
    /// The presenter decides validity; the view only displays it.
    fn refresh_open_form(&self) {
        match self.state() {
            FlowState::OrderDetails => self.push_order_form(),
            FlowState::ContactDetails => self.push_contact_form(),
            _ => {}
        }
    }

    fn push_order_form(&self) {
        let errors = self.draft.validate().only(ORDER_STEP_FIELDS);
        let ready = errors.is_empty();
        self.view
            .show_order_form(&self.draft.snapshot(), &errors, ready);
    }

    fn push_contact_form(&self) {
        let errors = self.draft.validate().only(CONTACT_STEP_FIELDS);
        let ready = errors.is_empty();
        self.view
            .show_contact_form(&self.draft.snapshot(), &errors, ready);
    }

    /// Returns to `Idle` on explicit close.
    ///
    /// Cart and draft are preserved so the user can resume. Any
    /// in-flight submission attempt is invalidated; its late result
    /// will be discarded.
    fn close(&self) {
        {
            let mut inner = self.inner.write().unwrap();
            if inner.state == FlowState::Idle {
                return;
            }
            tracing::debug!(state = %inner.state, "view closed");
            inner.state = FlowState::Idle;
            inner.attempt = None;
        }
        self.view.close();
    }

    /// Leaves `Success`, clearing the cart and the draft.
    fn acknowledge_success(&self) {
        {
            let mut inner = self.inner.write().unwrap();
            if inner.state != FlowState::Success {
                tracing::debug!(state = %inner.state, "success acknowledge ignored");
                return;
            }
            inner.state = FlowState::Idle;
            inner.attempt = None;
        }
        self.cart.clear();
        self.draft.clear();
        self.view.close();
    }
}
