//! Shopping cart model.

use std::sync::{Arc, RwLock};

use broker::EventBus;

use crate::catalog::Product;
use crate::events::StoreEvent;
use crate::value_objects::{Money, ProductId};

/// Ordered collection of line items.
///
/// A line item is the product itself; adding the same product twice
/// produces two entries, and removal by id takes out every matching
/// entry. A product with no price contributes zero to the total.
#[derive(Clone)]
pub struct Cart {
    bus: EventBus<StoreEvent>,
    items: Arc<RwLock<Vec<Product>>>,
}

impl Cart {
    /// Creates an empty cart publishing to the given bus.
    pub fn new(bus: EventBus<StoreEvent>) -> Self {
        Self {
            bus,
            items: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Appends a line item for `product`.
    ///
    /// Always succeeds; no deduplication or quantity merging. Publishes
    /// `CartChanged` with the new snapshot.
    pub fn add(&self, product: Product) {
        self.items.write().unwrap().push(product);
        metrics::counter!("cart_items_added").increment(1);
        self.publish_changed();
    }

    /// Removes every line item whose product id equals `id`.
    ///
    /// A cart with no matching entry is left untouched and publishes
    /// nothing. Publishes `CartChanged` otherwise.
    pub fn remove(&self, id: &ProductId) {
        let removed = {
            let mut items = self.items.write().unwrap();
            let before = items.len();
            items.retain(|p| &p.id != id);
            before - items.len()
        };
        if removed > 0 {
            tracing::debug!(%id, removed, "cart entries removed");
            self.publish_changed();
        }
    }

    /// Empties the cart and publishes `CartChanged`.
    pub fn clear(&self) {
        self.items.write().unwrap().clear();
        self.publish_changed();
    }

    /// Returns the sum of item prices, counting absent prices as zero.
    pub fn total(&self) -> Money {
        self.items
            .read()
            .unwrap()
            .iter()
            .map(|p| p.price.unwrap_or_default())
            .sum()
    }

    /// Returns the number of line items.
    pub fn count(&self) -> usize {
        self.items.read().unwrap().len()
    }

    /// Returns true if any line item references the given product id.
    pub fn has(&self, id: &ProductId) -> bool {
        self.items.read().unwrap().iter().any(|p| &p.id == id)
    }

    /// Returns true if the cart holds no line items.
    pub fn is_empty(&self) -> bool {
        self.items.read().unwrap().is_empty()
    }

    /// Returns a snapshot of the line items in insertion order.
    pub fn items(&self) -> Vec<Product> {
        self.items.read().unwrap().clone()
    }

    fn publish_changed(&self) {
        self.bus.publish(StoreEvent::CartChanged {
            items: self.items(),
            total: self.total(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use broker::BusEvent;
    use crate::events::StoreEventKind;
    use std::sync::Mutex;

    fn product(id: &str, price: Option<i64>) -> Product {
        Product {
            id: ProductId::new(id),
            title: format!("Product {id}"),
            description: String::new(),
            image: format!("{id}.png"),
            category: "misc".to_string(),
            price: price.map(Money::from_cents),
        }
    }

    fn cart_with_events() -> (Cart, Arc<Mutex<Vec<StoreEvent>>>) {
        let bus = EventBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        bus.subscribe(StoreEventKind::CartChanged, move |e: &StoreEvent| {
            sink.lock().unwrap().push(e.clone())
        });
        (Cart::new(bus), seen)
    }

    /// Checks the cart invariant after a mutation.
    fn assert_invariant(cart: &Cart) {
        let expected: Money = cart
            .items()
            .iter()
            .map(|p| p.price.unwrap_or_default())
            .sum();
        assert_eq!(cart.total(), expected);
        assert_eq!(cart.count(), cart.items().len());
    }

    #[test]
    fn test_add_appends_without_merging() {
        let (cart, _) = cart_with_events();
        cart.add(product("a", Some(10)));
        cart.add(product("a", Some(10)));

        assert_eq!(cart.count(), 2);
        assert_eq!(cart.total(), Money::from_cents(20));
        assert_invariant(&cart);
    }

    #[test]
    fn test_round_trip_totals() {
        let (cart, _) = cart_with_events();
        cart.add(product("a", Some(10)));
        cart.add(product("b", Some(20)));
        assert_eq!(cart.total(), Money::from_cents(30));
        assert_eq!(cart.count(), 2);

        cart.remove(&ProductId::new("a"));
        assert_eq!(cart.total(), Money::from_cents(20));
        assert_eq!(cart.count(), 1);
        assert_invariant(&cart);
    }

    #[test]
    fn test_remove_takes_out_every_matching_entry() {
        let (cart, _) = cart_with_events();
        cart.add(product("a", Some(10)));
        cart.add(product("b", Some(20)));
        cart.add(product("a", Some(10)));

        cart.remove(&ProductId::new("a"));

        assert_eq!(cart.count(), 1);
        assert!(!cart.has(&ProductId::new("a")));
        assert!(cart.has(&ProductId::new("b")));
        assert_invariant(&cart);
    }

    #[test]
    fn test_remove_without_match_is_a_silent_noop() {
        let (cart, seen) = cart_with_events();
        cart.add(product("a", Some(10)));
        let events_before = seen.lock().unwrap().len();

        cart.remove(&ProductId::new("missing"));

        assert_eq!(cart.count(), 1);
        assert_eq!(seen.lock().unwrap().len(), events_before);
    }

    #[test]
    fn test_priceless_items_count_as_zero() {
        let (cart, _) = cart_with_events();
        cart.add(product("free", None));
        cart.add(product("a", Some(10)));

        assert_eq!(cart.total(), Money::from_cents(10));
        assert_eq!(cart.count(), 2);
        assert_invariant(&cart);
    }

    #[test]
    fn test_clear_empties_and_publishes() {
        let (cart, seen) = cart_with_events();
        cart.add(product("a", Some(10)));
        cart.clear();

        assert!(cart.is_empty());
        assert_eq!(cart.total(), Money::zero());

        let last = seen.lock().unwrap().last().cloned().unwrap();
        assert_eq!(last.kind(), StoreEventKind::CartChanged);
        assert!(matches!(
            last,
            StoreEvent::CartChanged { items, total } if items.is_empty() && total.is_zero()
        ));
    }

    #[test]
    fn test_changed_event_carries_snapshot() {
        let (cart, seen) = cart_with_events();
        cart.add(product("a", Some(10)));

        let last = seen.lock().unwrap().last().cloned().unwrap();
        match last {
            StoreEvent::CartChanged { items, total } => {
                assert_eq!(items.len(), 1);
                assert_eq!(total, Money::from_cents(10));
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }
}
