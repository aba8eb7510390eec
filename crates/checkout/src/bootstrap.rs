//! Composition root for the storefront.

use std::sync::Arc;

use broker::EventBus;
use domain::{Cart, Catalog, OrderDraft, StoreEvent};

use crate::error::CheckoutError;
use crate::flow::CheckoutFlow;
use crate::pump::EventPump;
use crate::services::{OrderTransport, ProductSource, ViewSink};

/// One fully wired storefront: bus, models, workflow, pump.
///
/// Everything is built here and handed references; there are no module
/// globals. Tests and the demo binary drive it by publishing events and
/// draining.
pub struct Storefront<P, T, V>
where
    P: ProductSource,
    T: OrderTransport,
    V: ViewSink,
{
    bus: EventBus<StoreEvent>,
    catalog: Catalog,
    cart: Cart,
    draft: OrderDraft,
    flow: Arc<CheckoutFlow<P, T, V>>,
    pump: EventPump,
}

impl<P, T, V> Storefront<P, T, V>
where
    P: ProductSource,
    T: OrderTransport,
    V: ViewSink,
{
    /// Wires one instance of everything around the given collaborators.
    pub fn new(products: P, transport: T, view: V) -> Self {
        let bus: EventBus<StoreEvent> = EventBus::new();
        let catalog = Catalog::new(bus.clone());
        let cart = Cart::new(bus.clone());
        let draft = OrderDraft::new(bus.clone());

        // The pump must exist before any model publishes.
        let pump = EventPump::attach(&bus);

        let flow = Arc::new(CheckoutFlow::new(
            catalog.clone(),
            cart.clone(),
            draft.clone(),
            products,
            transport,
            view,
        ));

        Self {
            bus,
            catalog,
            cart,
            draft,
            flow,
            pump,
        }
    }

    /// Loads the catalog and processes the resulting events.
    pub async fn start(&mut self) -> Result<(), CheckoutError> {
        let result = self.flow.load_catalog().await;
        self.drain().await;
        result
    }

    /// Publishes one event and processes everything it triggers.
    pub async fn dispatch(&mut self, event: StoreEvent) {
        self.bus.publish(event);
        self.drain().await;
    }

    /// Processes every event currently queued.
    pub async fn drain(&mut self) {
        self.pump.drain(&self.flow).await;
    }

    /// Returns the bus handle.
    pub fn bus(&self) -> &EventBus<StoreEvent> {
        &self.bus
    }

    /// Returns the catalog model.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Returns the cart model.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Returns the order draft model.
    pub fn draft(&self) -> &OrderDraft {
        &self.draft
    }

    /// Returns the workflow.
    pub fn flow(&self) -> &Arc<CheckoutFlow<P, T, V>> {
        &self.flow
    }
}
