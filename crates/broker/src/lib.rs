//! Typed publish/subscribe bus.
//!
//! The bus decouples publishers from subscribers: models publish facts,
//! presenters subscribe to them, and neither knows the other's identity.
//! Events are a single tagged type with a copyable kind discriminant, so
//! every payload is typed at the edges rather than dispatched by string.
//!
//! Delivery is synchronous and runs to completion in registration order.
//! There is no queue and no replay: a handler registered after a publish
//! never sees that publish.

pub mod bus;
pub mod event;

pub use bus::{EventBus, PublishOutcome};
pub use event::{BusEvent, SubscriptionId};
