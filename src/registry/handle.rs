//! Subscription session handles.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use super::subscriptions::{Handler, SubscriptionRegistry};
use crate::view::ScopeId;

/// One subscription session for an (event name, scope) pair.
///
/// Returned by [`SocketRelay::on`](crate::relay::SocketRelay::on) and
/// [`SocketRelay::on_scoped`](crate::relay::SocketRelay::on_scoped). The
/// handle carries identifiers only; all subscription state lives in the
/// registry and is keyed by event name and scope id, not by handle
/// identity. Two handles sharing an event name and scope therefore share
/// storage: destroying either one revokes every handler registered for the
/// pair, not just those added through the destroyed handle.
#[derive(Clone)]
pub struct EventHandle {
    registry: SubscriptionRegistry,
    event: String,
    scope: Option<ScopeId>,
}

impl EventHandle {
    pub(crate) fn new(
        registry: SubscriptionRegistry,
        event: String,
        scope: Option<ScopeId>,
    ) -> Self {
        Self {
            registry,
            event,
            scope,
        }
    }

    /// Event name this handle is bound to.
    #[must_use]
    pub fn event(&self) -> &str {
        &self.event
    }

    /// Scope id this handle is bound to, or `None` for a global handle.
    #[must_use]
    pub fn scope(&self) -> Option<&ScopeId> {
        self.scope.as_ref()
    }

    /// Registers a handler for this handle's event.
    ///
    /// The transport listener for the event name is attached on the first
    /// registration and shared by all subsequent ones. Chainable:
    /// `handle.then(a).then(b)` registers both handlers.
    pub fn then(&self, handler: impl Fn(&[Value]) + Send + Sync + 'static) -> &Self {
        let handler: Handler = Arc::new(handler);
        self.registry
            .add_handler(&self.event, self.scope.as_ref(), handler);
        self
    }

    /// Revokes every handler registered for this handle's (event, scope)
    /// pair, detaching the transport listener when the last handler for the
    /// event name disappears.
    ///
    /// Idempotent: a repeat call finds nothing to remove and returns 0.
    /// Returns the number of handlers removed.
    pub fn destroy(&self) -> usize {
        self.registry.remove_all(&self.event, self.scope.as_ref())
    }
}

impl fmt::Debug for EventHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventHandle")
            .field("event", &self.event)
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}
