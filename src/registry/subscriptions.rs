//! Event-name subscription store and fan-out dispatch.
//!
//! [`SubscriptionRegistry`] owns every piece of subscription state for one
//! transport pairing: per event name, a reference count, the scope-less
//! handler list, and one handler list per subscribing scope. It also owns
//! attach/detach of the single transport-level listener per event name.
//!
//! # Invariants
//!
//! - The reference count for an event name equals the total number of
//!   registered handlers for it, across the global list and all scopes.
//! - A transport listener for an event name is attached if and only if that
//!   count is greater than zero, and there is never more than one.
//! - Within one dispatch, global handlers run strictly before any scope
//!   handler, and all scope handlers run inside a single view-update batch.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use serde_json::Value;

use super::handle::EventHandle;
use crate::transport::{DispatchFn, Transport};
use crate::view::{Scope, ScopeId, ViewBinding};

/// Handler callback registered through [`EventHandle::then`].
pub type Handler = Arc<dyn Fn(&[Value]) + Send + Sync>;

/// Per-event-name subscription state.
///
/// `dispatch` is `Some` exactly while the transport listener for this event
/// name is attached, which by the refcount invariant is exactly while
/// `ref_count > 0` (modulo the instant between attach and first append).
struct EventEntry {
    ref_count: usize,
    global: Vec<Handler>,
    /// Scope handler lists in scope-insertion order.
    scoped: Vec<(ScopeId, Vec<Handler>)>,
    dispatch: Option<DispatchFn>,
}

impl EventEntry {
    fn empty() -> Self {
        Self {
            ref_count: 0,
            global: Vec::new(),
            scoped: Vec::new(),
            dispatch: None,
        }
    }
}

struct Inner {
    transport: Arc<dyn Transport>,
    view: Arc<dyn ViewBinding>,
    events: Mutex<HashMap<String, EventEntry>>,
}

impl Inner {
    /// Fan-out for one incoming event.
    ///
    /// Global handlers run first, synchronously, with nothing caught — a
    /// panicking handler aborts the remaining handlers for this dispatch
    /// and propagates to the transport's invocation context. Scope handlers
    /// run afterwards inside a single [`ViewBinding::apply`] batch, in
    /// scope-insertion order; the batch is skipped entirely when no scope
    /// handler exists. Handler lists are copied out of the lock before
    /// invocation, so a handler may subscribe or destroy re-entrantly.
    fn dispatch(&self, event: &str, args: &[Value]) -> bool {
        let (global, scoped) = {
            let events = self.lock_events();
            match events.get(event) {
                Some(entry) => {
                    let scoped: Vec<Handler> = entry
                        .scoped
                        .iter()
                        .flat_map(|(_, handlers)| handlers.iter().map(Arc::clone))
                        .collect();
                    (entry.global.clone(), scoped)
                }
                None => (Vec::new(), Vec::new()),
            }
        };

        tracing::trace!(event, global = global.len(), scoped = scoped.len(), "dispatch");

        for handler in &global {
            handler(args);
        }

        if !scoped.is_empty() {
            self.view.apply(&mut || {
                for handler in &scoped {
                    handler(args);
                }
            });
        }

        true
    }

    fn lock_events(&self) -> MutexGuard<'_, HashMap<String, EventEntry>> {
        // A panic elsewhere while holding the lock must not wedge every
        // later subscription; the maps stay structurally valid.
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Central store of all subscriptions for one transport pairing.
///
/// Constructed once per relay and shared (cheap clone) by every
/// [`EventHandle`]; all subscription mutation routes through here, the
/// handles carry identifiers only.
#[derive(Clone)]
pub struct SubscriptionRegistry {
    inner: Arc<Inner>,
}

impl SubscriptionRegistry {
    /// Creates an empty registry over `transport`, batching scope handlers
    /// through `view`.
    pub(crate) fn new(transport: Arc<dyn Transport>, view: Arc<dyn ViewBinding>) -> Self {
        Self {
            inner: Arc::new(Inner {
                transport,
                view,
                events: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Creates a subscription handle for `event`, bound to `scope`'s id
    /// when one is given.
    ///
    /// Registers the scope-teardown hook (so the subscription is revoked
    /// when the scope is disposed) but attaches no handler and no transport
    /// listener yet; that happens on the first [`EventHandle::then`].
    pub(crate) fn subscribe(&self, event: &str, scope: Option<&dyn Scope>) -> EventHandle {
        {
            let mut events = self.inner.lock_events();
            events
                .entry(event.to_string())
                .or_insert_with(EventEntry::empty);
        }

        let scope_id = scope.map(|s| s.id());
        let handle = EventHandle::new(self.clone(), event.to_string(), scope_id);

        if let Some(scope) = scope {
            let teardown_handle = handle.clone();
            scope.on_teardown(Box::new(move || {
                let removed = teardown_handle.destroy();
                tracing::debug!(
                    event = teardown_handle.event(),
                    removed,
                    "scope teardown revoked subscription"
                );
            }));
        }

        handle
    }

    /// Appends `handler` under `(event, scope_id)`, attaching the transport
    /// listener first when none is attached for the name, and increments
    /// the reference count.
    pub(crate) fn add_handler(&self, event: &str, scope_id: Option<&ScopeId>, handler: Handler) {
        self.ensure_listening(event);

        let mut events = self.inner.lock_events();
        let entry = events
            .entry(event.to_string())
            .or_insert_with(EventEntry::empty);
        match scope_id {
            Some(id) => {
                if let Some((_, handlers)) = entry.scoped.iter_mut().find(|(sid, _)| sid == id) {
                    handlers.push(handler);
                } else {
                    entry.scoped.push((id.clone(), vec![handler]));
                }
            }
            None => entry.global.push(handler),
        }
        entry.ref_count += 1;
    }

    /// Attaches the single transport listener for `event` if none is
    /// attached. Idempotent; called on every handler registration.
    fn ensure_listening(&self, event: &str) {
        let dispatch: DispatchFn = {
            let mut events = self.inner.lock_events();
            let entry = events
                .entry(event.to_string())
                .or_insert_with(EventEntry::empty);
            if entry.dispatch.is_some() {
                return;
            }
            // Weak back-reference: the listener stored inside the transport
            // must not keep the registry alive.
            let registry = Arc::downgrade(&self.inner);
            let name = event.to_string();
            let dispatch: DispatchFn = Arc::new(move |args: &[Value]| {
                match Weak::upgrade(&registry) {
                    Some(registry) => registry.dispatch(&name, args),
                    None => false,
                }
            });
            entry.dispatch = Some(Arc::clone(&dispatch));
            dispatch
        };

        tracing::debug!(event, "attaching transport listener");
        self.inner.transport.on(event, dispatch);
    }

    /// Removes every handler registered under `(event, scope_id)` and
    /// decrements the reference count by that many; detaches the transport
    /// listener when the count reaches zero.
    ///
    /// Safe to call when nothing is registered for the pair — repeat
    /// destroys are no-ops. Returns the number of handlers removed.
    pub(crate) fn remove_all(&self, event: &str, scope_id: Option<&ScopeId>) -> usize {
        let (removed, detach) = {
            let mut events = self.inner.lock_events();
            let Some(entry) = events.get_mut(event) else {
                return 0;
            };

            let removed = match scope_id {
                Some(id) => match entry.scoped.iter().position(|(sid, _)| sid == id) {
                    Some(pos) => entry.scoped.remove(pos).1.len(),
                    None => 0,
                },
                None => std::mem::take(&mut entry.global).len(),
            };
            entry.ref_count -= removed;

            let detach = if entry.ref_count == 0 {
                let dispatch = entry.dispatch.take();
                events.remove(event);
                dispatch
            } else {
                None
            };
            (removed, detach)
        };

        if let Some(dispatch) = detach {
            tracing::debug!(event, removed, "detaching transport listener");
            self.inner.transport.remove_listener(event, &dispatch);
        }
        removed
    }

    /// Returns the current reference count — the total number of registered
    /// handlers — for `event`.
    #[must_use]
    pub fn handler_count(&self, event: &str) -> usize {
        self.inner.lock_events().get(event).map_or(0, |e| e.ref_count)
    }

    /// Returns `true` while a transport listener is attached for `event`.
    #[must_use]
    pub fn is_listening(&self, event: &str) -> bool {
        self.inner
            .lock_events()
            .get(event)
            .is_some_and(|e| e.dispatch.is_some())
    }
}

impl fmt::Debug for SubscriptionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriptionRegistry")
            .field("events", &self.inner.lock_events().len())
            .finish_non_exhaustive()
    }
}
