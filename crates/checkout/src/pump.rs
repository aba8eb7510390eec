//! Event pump feeding bus traffic into the workflow.

use broker::{BusEvent, EventBus, SubscriptionId};
use domain::StoreEvent;
use tokio::sync::mpsc;

use crate::flow::CheckoutFlow;
use crate::services::{OrderTransport, ProductSource, ViewSink};

/// Wildcard subscriber that queues every bus event for the workflow.
///
/// Bus delivery stays synchronous; the pump just forwards each event
/// into an unbounded channel and hands them to the flow one at a time.
/// Events published by the flow's own handling (model notifications)
/// are queued for the next turn, so dispatch never re-enters itself.
pub struct EventPump {
    bus: EventBus<StoreEvent>,
    rx: mpsc::UnboundedReceiver<StoreEvent>,
    subscription: SubscriptionId,
}

impl EventPump {
    /// Attaches a pump to the bus.
    ///
    /// Attach before any model publishes, or those events are lost (the
    /// bus never replays).
    pub fn attach(bus: &EventBus<StoreEvent>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let subscription = bus.subscribe_any(move |event: &StoreEvent| {
            // Receiver dropped means the pump is gone; nothing to do.
            let _ = tx.send(event.clone());
        });
        Self {
            bus: bus.clone(),
            rx,
            subscription,
        }
    }

    /// Processes every event currently queued, including the ones
    /// enqueued by the processing itself. Returns when the queue is dry.
    pub async fn drain<P, T, V>(&mut self, flow: &CheckoutFlow<P, T, V>)
    where
        P: ProductSource,
        T: OrderTransport,
        V: ViewSink,
    {
        while let Ok(event) = self.rx.try_recv() {
            self.dispatch(flow, event).await;
        }
    }

    /// Runs forever, processing events as they arrive.
    pub async fn run<P, T, V>(mut self, flow: std::sync::Arc<CheckoutFlow<P, T, V>>)
    where
        P: ProductSource,
        T: OrderTransport,
        V: ViewSink,
    {
        while let Some(event) = self.rx.recv().await {
            self.dispatch(&flow, event).await;
        }
    }

    async fn dispatch<P, T, V>(&self, flow: &CheckoutFlow<P, T, V>, event: StoreEvent)
    where
        P: ProductSource,
        T: OrderTransport,
        V: ViewSink,
    {
        if let Err(err) = flow.on_event(&event).await {
            tracing::warn!(kind = %event.kind(), %err, "event handling failed");
        }
    }
}

impl Drop for EventPump {
    fn drop(&mut self) {
        self.bus.unsubscribe(self.subscription);
    }
}
