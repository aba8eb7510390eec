//! Order transport trait and in-memory implementation.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use domain::{Money, OrderRequest};
use serde::{Deserialize, Serialize};

use crate::error::CheckoutError;

/// Confirmation returned by the transport for an accepted order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderReceipt {
    /// The order ID assigned by the server.
    pub order_id: String,

    /// Total the server accepted for the order.
    pub total: Money,
}

/// Trait for submitting an assembled order.
#[async_trait]
pub trait OrderTransport: Send + Sync {
    /// Submits the order; resolves with a receipt or a transport error.
    async fn submit_order(&self, request: &OrderRequest) -> Result<OrderReceipt, CheckoutError>;
}

#[derive(Debug, Default)]
struct InMemoryOrderTransportState {
    accepted: Vec<OrderRequest>,
    next_id: u32,
    call_count: u32,
    fail_on_submit: bool,
    delay: Option<Duration>,
}

/// In-memory order transport for tests and demos.
///
/// Supports failure injection and an artificial in-flight delay so the
/// double-submit and stale-response paths can be exercised.
#[derive(Clone, Default)]
pub struct InMemoryOrderTransport {
    state: Arc<RwLock<InMemoryOrderTransportState>>,
}

impl InMemoryOrderTransport {
    /// Creates a new transport that accepts every order.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the transport to reject submissions.
    pub fn set_fail_on_submit(&self, fail: bool) {
        self.state.write().unwrap().fail_on_submit = fail;
    }

    /// Holds every submission in flight for the given duration.
    pub fn set_delay(&self, delay: Duration) {
        self.state.write().unwrap().delay = Some(delay);
    }

    /// Returns the number of submit calls that reached the transport.
    pub fn call_count(&self) -> u32 {
        self.state.read().unwrap().call_count
    }

    /// Returns the number of orders accepted so far.
    pub fn accepted_count(&self) -> usize {
        self.state.read().unwrap().accepted.len()
    }

    /// Returns the most recently accepted order request.
    pub fn last_request(&self) -> Option<OrderRequest> {
        self.state.read().unwrap().accepted.last().cloned()
    }
}

#[async_trait]
impl OrderTransport for InMemoryOrderTransport {
    async fn submit_order(&self, request: &OrderRequest) -> Result<OrderReceipt, CheckoutError> {
        let delay = {
            let mut state = self.state.write().unwrap();
            state.call_count += 1;
            state.delay
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let mut state = self.state.write().unwrap();
        if state.fail_on_submit {
            return Err(CheckoutError::SubmissionFailed(
                "order service unavailable".to_string(),
            ));
        }

        state.next_id += 1;
        let order_id = format!("ORD-{:04}", state.next_id);
        state.accepted.push(request.clone());

        Ok(OrderReceipt {
            order_id,
            total: request.total,
        })
    }
}
