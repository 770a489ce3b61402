//! Subscription layer: the per-event-name registry and session handles.
//!
//! A subscription is keyed by event name and subscriber scope. The registry
//! attaches one transport-level listener per event name when the first
//! handler for that name appears and detaches it when the last one
//! disappears; in between, incoming events fan out to every registered
//! handler.

pub mod handle;
pub mod subscriptions;

pub use handle::EventHandle;
pub use subscriptions::{Handler, SubscriptionRegistry};
