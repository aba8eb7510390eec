//! The event bus implementation.

use std::collections::HashMap;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use crate::event::{BusEvent, SubscriptionId};

type Handler<E> = Arc<dyn Fn(&E) + Send + Sync>;

struct Entry<E> {
    id: SubscriptionId,
    handler: Handler<E>,
}

struct Registry<E: BusEvent> {
    by_kind: HashMap<E::Kind, Vec<Entry<E>>>,
    wildcard: Vec<Entry<E>>,
}

impl<E: BusEvent> Default for Registry<E> {
    fn default() -> Self {
        Self {
            by_kind: HashMap::new(),
            wildcard: Vec::new(),
        }
    }
}

/// Result of a single publish call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublishOutcome {
    /// Handlers that ran to completion.
    pub delivered: usize,

    /// Handlers that panicked and were isolated.
    pub failed: usize,
}

impl PublishOutcome {
    /// Returns true if every handler ran without panicking.
    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }
}

/// Publish/subscribe hub for a single event type.
///
/// The bus exclusively owns the subscriber list. Handlers for the exact
/// kind run first, in registration order, followed by wildcard handlers
/// in registration order. A handler that panics is caught and reported;
/// it never prevents delivery to the remaining handlers.
///
/// Cloning the bus produces another handle to the same subscriber list,
/// so models can each hold their own handle.
pub struct EventBus<E: BusEvent> {
    registry: Arc<RwLock<Registry<E>>>,
    published: Arc<AtomicU64>,
}

impl<E: BusEvent> Clone for EventBus<E> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            published: Arc::clone(&self.published),
        }
    }
}

impl<E: BusEvent> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: BusEvent> EventBus<E> {
    /// Creates a new bus with no subscribers.
    pub fn new() -> Self {
        Self {
            registry: Arc::new(RwLock::new(Registry::default())),
            published: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Registers `handler` for events of the given kind.
    pub fn subscribe<F>(&self, kind: E::Kind, handler: F) -> SubscriptionId
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        let id = SubscriptionId::new();
        let mut registry = self.registry.write().unwrap();
        registry.by_kind.entry(kind).or_default().push(Entry {
            id,
            handler: Arc::new(handler),
        });
        id
    }

    /// Registers a wildcard handler that receives every event.
    ///
    /// The event carries its own kind, so wildcard subscribers can route
    /// on `event.kind()` themselves.
    pub fn subscribe_any<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        let id = SubscriptionId::new();
        let mut registry = self.registry.write().unwrap();
        registry.wildcard.push(Entry {
            id,
            handler: Arc::new(handler),
        });
        id
    }

    /// Removes the subscription with the given ID.
    ///
    /// Idempotent: returns false if the subscription was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut registry = self.registry.write().unwrap();

        for entries in registry.by_kind.values_mut() {
            let before = entries.len();
            entries.retain(|e| e.id != id);
            if entries.len() != before {
                return true;
            }
        }

        let before = registry.wildcard.len();
        registry.wildcard.retain(|e| e.id != id);
        registry.wildcard.len() != before
    }

    /// Delivers `event` synchronously to every matching subscriber.
    ///
    /// The subscriber snapshot is taken at publish time, so handlers may
    /// subscribe, unsubscribe, or publish from inside a delivery without
    /// affecting the current one.
    pub fn publish(&self, event: E) -> PublishOutcome {
        let handlers: Vec<Handler<E>> = {
            let registry = self.registry.read().unwrap();
            registry
                .by_kind
                .get(&event.kind())
                .map(|v| v.as_slice())
                .unwrap_or_default()
                .iter()
                .chain(registry.wildcard.iter())
                .map(|e| Arc::clone(&e.handler))
                .collect()
        };

        self.published.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("bus_events_published").increment(1);

        let mut outcome = PublishOutcome::default();
        for handler in handlers {
            match catch_unwind(AssertUnwindSafe(|| handler(&event))) {
                Ok(()) => outcome.delivered += 1,
                Err(_) => {
                    outcome.failed += 1;
                    metrics::counter!("bus_handler_panics").increment(1);
                    tracing::error!(kind = ?event.kind(), "event handler panicked during delivery");
                }
            }
        }
        outcome
    }

    /// Returns the total number of registered subscriptions.
    pub fn subscriber_count(&self) -> usize {
        let registry = self.registry.read().unwrap();
        registry.by_kind.values().map(Vec::len).sum::<usize>() + registry.wildcard.len()
    }

    /// Returns the number of events published so far.
    pub fn published_count(&self) -> u64 {
        self.published.load(Ordering::Relaxed)
    }
}
