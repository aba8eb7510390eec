//! Collaborator seams consumed by the checkout workflow.
//!
//! The workflow talks to three externals: a product source (async, may
//! fail), an order transport (async, may fail), and a view sink (sync
//! render collaborator). Each comes with an in-memory implementation
//! used by tests and the demo binary.

mod products;
mod transport;
mod views;

pub use products::{InMemoryProductSource, ProductSource};
pub use transport::{InMemoryOrderTransport, OrderReceipt, OrderTransport};
pub use views::{RecordingViewSink, ViewCall, ViewSink};
