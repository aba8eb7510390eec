//! Product catalog model.

use std::sync::{Arc, RwLock};

use broker::EventBus;
use serde::{Deserialize, Serialize};

use crate::events::StoreEvent;
use crate::value_objects::{Money, ProductId};

/// A purchasable item as delivered by the product source.
///
/// Immutable once loaded. A product with no price is "priceless": it can
/// be browsed but the workflow refuses to put it in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Identifier assigned by the product source.
    pub id: ProductId,

    /// Display title.
    pub title: String,

    /// Long description shown in the preview.
    pub description: String,

    /// Reference to the product image.
    pub image: String,

    /// Category label.
    pub category: String,

    /// Price, absent for priceless products.
    pub price: Option<Money>,
}

impl Product {
    /// Returns true if the product carries a price.
    pub fn purchasable(&self) -> bool {
        self.price.is_some()
    }
}

#[derive(Debug, Default)]
struct CatalogInner {
    products: Vec<Product>,
    selected: Option<ProductId>,
}

/// Ordered collection of products plus the currently inspected one.
///
/// The selection is a lookup reference, not ownership: it holds the id
/// and resolves it against the product list on demand. Replacing the
/// product list clears the selection.
#[derive(Clone)]
pub struct Catalog {
    bus: EventBus<StoreEvent>,
    inner: Arc<RwLock<CatalogInner>>,
}

impl Catalog {
    /// Creates an empty catalog publishing to the given bus.
    pub fn new(bus: EventBus<StoreEvent>) -> Self {
        Self {
            bus,
            inner: Arc::new(RwLock::new(CatalogInner::default())),
        }
    }

    /// Replaces the product list wholesale, in source order.
    ///
    /// Clears any existing selection and publishes `CatalogLoaded`.
    pub fn set_products(&self, products: Vec<Product>) {
        let count = products.len();
        {
            let mut inner = self.inner.write().unwrap();
            inner.products = products;
            inner.selected = None;
        }
        tracing::debug!(count, "catalog replaced");
        self.bus.publish(StoreEvent::CatalogLoaded { count });
    }

    /// Returns a snapshot of all products in source order.
    pub fn products(&self) -> Vec<Product> {
        self.inner.read().unwrap().products.clone()
    }

    /// Looks up a product by id.
    pub fn product(&self, id: &ProductId) -> Option<Product> {
        let inner = self.inner.read().unwrap();
        inner.products.iter().find(|p| &p.id == id).cloned()
    }

    /// Marks the product with the given id as currently inspected.
    ///
    /// Publishes `ProductSelected` with the product. An unknown id is
    /// ignored.
    pub fn select(&self, id: &ProductId) {
        let product = {
            let mut inner = self.inner.write().unwrap();
            match inner.products.iter().find(|p| &p.id == id).cloned() {
                Some(product) => {
                    inner.selected = Some(id.clone());
                    product
                }
                None => {
                    tracing::debug!(%id, "select ignored: unknown product");
                    return;
                }
            }
        };
        self.bus.publish(StoreEvent::ProductSelected { product });
    }

    /// Clears the inspected-product reference and publishes
    /// `SelectionCleared`.
    pub fn clear_selection(&self) {
        self.inner.write().unwrap().selected = None;
        self.bus.publish(StoreEvent::SelectionCleared);
    }

    /// Returns the currently inspected product, if any.
    pub fn selected(&self) -> Option<Product> {
        let inner = self.inner.read().unwrap();
        let id = inner.selected.as_ref()?;
        inner.products.iter().find(|p| &p.id == id).cloned()
    }

    /// Returns the number of products.
    pub fn len(&self) -> usize {
        self.inner.read().unwrap().products.len()
    }

    /// Returns true if the catalog holds no products.
    pub fn is_empty(&self) -> bool {
        self.inner.read().unwrap().products.is_empty()
    }
}
