//! Transport boundary contract.
//!
//! The relay never drives a concrete socket; it works against anything
//! implementing [`Transport`]. The transport is assumed to deliver already
//! decoded events — framing and serialization are its problem, not ours.
//!
//! Listener removal is by function identity: the relay hands back the exact
//! [`DispatchFn`] it registered, and the transport must deregister that same
//! `Arc` (compare with [`Arc::ptr_eq`]).

use std::sync::Arc;

use serde_json::Value;

/// Fan-out function the registry installs on the transport, one per event
/// name. Invoked with the decoded event payload; returns `true` when the
/// event was handled.
pub type DispatchFn = Arc<dyn Fn(&[Value]) -> bool + Send + Sync>;

/// Trailing acknowledgement callback appended to every outbound emission.
///
/// The transport must invoke it at most once, with the reply arguments
/// shaped the way the configured
/// [`ResponseMode`](crate::bridge::ResponseMode) expects: an
/// `(error, result)` pair in raw mode, or a single response object in HTTP
/// mode.
pub type ReplyCallback = Box<dyn FnOnce(Vec<Value>) + Send>;

/// Bidirectional event channel the relay wraps.
pub trait Transport: Send + Sync {
    /// Registers a listener for the named event.
    fn on(&self, event: &str, handler: DispatchFn);

    /// Removes a previously registered listener.
    ///
    /// `handler` is the same `Arc` that was passed to [`Transport::on`].
    fn remove_listener(&self, event: &str, handler: &DispatchFn);

    /// Sends a message and invites exactly one invocation of `ack`.
    fn emit(&self, event: &str, args: Vec<Value>, ack: ReplyCallback);
}
