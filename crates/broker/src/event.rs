//! Event trait and subscription identity.

use std::fmt::Debug;
use std::hash::Hash;

use uuid::Uuid;

/// An event that can travel over the bus.
///
/// Implementors are tagged enums: one variant per notification, with the
/// payload type fixed per variant. `Kind` is the cheap discriminant used
/// for subscription routing.
pub trait BusEvent: Clone + Send + Sync + 'static {
    /// The discriminant type used to route subscriptions.
    type Kind: Copy + Eq + Hash + Debug + Send + Sync + 'static;

    /// Returns the kind of this event.
    fn kind(&self) -> Self::Kind;
}

/// Unique identifier for a subscription.
///
/// Returned by `subscribe`; the bus retains exclusive ownership of the
/// subscriber list, so this token is the only way to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    /// Creates a new random subscription ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for SubscriptionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
