//! Product source trait and in-memory implementation.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use domain::Product;

use crate::error::CheckoutError;

/// Trait for fetching the purchasable product list.
#[async_trait]
pub trait ProductSource: Send + Sync {
    /// Fetches all products in server order.
    async fn fetch_products(&self) -> Result<Vec<Product>, CheckoutError>;
}

#[derive(Debug, Default)]
struct InMemoryProductSourceState {
    products: Vec<Product>,
    fetch_count: u32,
    fail_on_fetch: bool,
}

/// In-memory product source for tests and demos.
#[derive(Clone, Default)]
pub struct InMemoryProductSource {
    state: Arc<RwLock<InMemoryProductSourceState>>,
}

impl InMemoryProductSource {
    /// Creates an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a source that serves the given products.
    pub fn with_products(products: Vec<Product>) -> Self {
        let source = Self::new();
        source.state.write().unwrap().products = products;
        source
    }

    /// Replaces the served product list.
    pub fn set_products(&self, products: Vec<Product>) {
        self.state.write().unwrap().products = products;
    }

    /// Configures the source to fail fetch calls.
    pub fn set_fail_on_fetch(&self, fail: bool) {
        self.state.write().unwrap().fail_on_fetch = fail;
    }

    /// Returns the number of fetch calls made so far.
    pub fn fetch_count(&self) -> u32 {
        self.state.read().unwrap().fetch_count
    }
}

#[async_trait]
impl ProductSource for InMemoryProductSource {
    async fn fetch_products(&self) -> Result<Vec<Product>, CheckoutError> {
        let mut state = self.state.write().unwrap();
        state.fetch_count += 1;

        if state.fail_on_fetch {
            return Err(CheckoutError::LoadFailed(
                "product source unavailable".to_string(),
            ));
        }

        Ok(state.products.clone())
    }
}
