//! Domain layer for the storefront.
//!
//! This crate provides the state the checkout workflow coordinates:
//! - Product catalog with a selection reference
//! - Shopping cart with line items and totals
//! - Order draft with field validation and request assembly
//! - The tagged event type all models publish over the bus
//!
//! Each model holds its own bus handle and publishes a typed notification
//! after every mutation; none of them knows who is listening.

pub mod cart;
pub mod catalog;
pub mod draft;
pub mod events;
pub mod value_objects;

pub use cart::Cart;
pub use catalog::{Catalog, Product};
pub use draft::{DraftData, DraftError, DraftField, OrderDraft, OrderRequest, ValidationErrors};
pub use events::{StoreEvent, StoreEventKind};
pub use value_objects::{Money, PaymentMethod, ProductId};
