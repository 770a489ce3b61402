//! Shared test doubles for the transport and view boundaries.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::Value;

use crate::transport::{DispatchFn, ReplyCallback, Transport};
use crate::view::{Scope, ScopeId, TeardownFn, ViewBinding};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Captured outbound emission: event name, forwarded args, pending ack.
pub struct CapturedEmit {
    /// Event name passed to `emit`.
    pub event: String,
    /// Forwarded payload after argument filtering.
    pub args: Vec<Value>,
    /// Acknowledgement callback the bridge appended.
    pub ack: ReplyCallback,
}

/// Transport double recording listener registrations and emissions.
#[derive(Default)]
pub struct RecordingTransport {
    listeners: Mutex<HashMap<String, Vec<DispatchFn>>>,
    emits: Mutex<Vec<CapturedEmit>>,
}

impl RecordingTransport {
    /// Number of listeners currently registered for `event`.
    pub fn listener_count(&self, event: &str) -> usize {
        lock(&self.listeners).get(event).map_or(0, Vec::len)
    }

    /// Delivers an incoming event through every registered listener,
    /// returning each listener's result.
    pub fn fire(&self, event: &str, args: &[Value]) -> Vec<bool> {
        let handlers: Vec<DispatchFn> = lock(&self.listeners)
            .get(event)
            .map(|v| v.iter().map(Arc::clone).collect())
            .unwrap_or_default();
        let mut results = Vec::with_capacity(handlers.len());
        for handler in handlers {
            results.push(handler(args));
        }
        results
    }

    /// Pops the oldest captured emission, if any.
    pub fn take_emit(&self) -> Option<CapturedEmit> {
        let mut emits = lock(&self.emits);
        if emits.is_empty() {
            None
        } else {
            Some(emits.remove(0))
        }
    }

    /// Number of captured emissions not yet taken.
    pub fn emit_count(&self) -> usize {
        lock(&self.emits).len()
    }
}

impl Transport for RecordingTransport {
    fn on(&self, event: &str, handler: DispatchFn) {
        lock(&self.listeners)
            .entry(event.to_string())
            .or_default()
            .push(handler);
    }

    fn remove_listener(&self, event: &str, handler: &DispatchFn) {
        let mut listeners = lock(&self.listeners);
        if let Some(registered) = listeners.get_mut(event) {
            registered.retain(|h| !Arc::ptr_eq(h, handler));
            if registered.is_empty() {
                listeners.remove(event);
            }
        }
    }

    fn emit(&self, event: &str, args: Vec<Value>, ack: ReplyCallback) {
        lock(&self.emits).push(CapturedEmit {
            event: event.to_string(),
            args,
            ack,
        });
    }
}

/// Scope double whose teardown is fired manually.
pub struct FakeScope {
    id: ScopeId,
    teardowns: Mutex<Vec<TeardownFn>>,
}

impl FakeScope {
    /// Creates a scope with the given id.
    pub fn new(id: &str) -> Self {
        Self {
            id: ScopeId::new(id),
            teardowns: Mutex::new(Vec::new()),
        }
    }

    /// Simulates the view framework disposing this scope: every registered
    /// teardown callback runs exactly once.
    pub fn fire_teardown(&self) {
        let callbacks: Vec<TeardownFn> = std::mem::take(&mut *lock(&self.teardowns));
        for callback in callbacks {
            callback();
        }
    }
}

impl Scope for FakeScope {
    fn id(&self) -> ScopeId {
        self.id.clone()
    }

    fn on_teardown(&self, callback: TeardownFn) {
        lock(&self.teardowns).push(callback);
    }
}

/// View double counting how many update batches were entered.
#[derive(Default)]
pub struct CountingView {
    batches: AtomicUsize,
}

impl CountingView {
    /// Number of [`ViewBinding::apply`] batches entered so far.
    pub fn batches(&self) -> usize {
        self.batches.load(Ordering::SeqCst)
    }
}

impl ViewBinding for CountingView {
    fn apply(&self, mutation: &mut dyn FnMut()) {
        self.batches.fetch_add(1, Ordering::SeqCst);
        mutation();
    }
}
