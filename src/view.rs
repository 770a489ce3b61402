//! View-binding boundary: scopes, teardown hooks, and the single-batch
//! re-render primitive.
//!
//! The relay never talks to a concrete view framework. It only needs two
//! seams: a [`Scope`] (a component-instance lifetime that can announce its
//! own disposal) and a [`ViewBinding`] (a way to run handler side effects
//! inside exactly one re-render pass).

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identifier of a subscribing scope, stable for its lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScopeId(String);

impl ScopeId {
    /// Creates a scope id from any string-like value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Callback registered for scope disposal.
pub type TeardownFn = Box<dyn FnOnce() + Send>;

/// A component-instance lifetime boundary in the view framework.
///
/// Every subscription bound to a scope is revoked automatically when the
/// scope is torn down.
pub trait Scope: Send + Sync {
    /// Stable unique identifier for the lifetime of this scope.
    fn id(&self) -> ScopeId;

    /// Registers a callback invoked exactly once when the scope is disposed.
    fn on_teardown(&self, callback: TeardownFn);
}

/// Change-detection entry point of the view framework.
///
/// [`ViewBinding::apply`] runs the mutation synchronously and then triggers
/// exactly one re-render pass, so several handler side effects triggered by
/// a single event collapse into one update cycle.
pub trait ViewBinding: Send + Sync {
    /// Runs `mutation` inside one view-update batch.
    fn apply(&self, mutation: &mut dyn FnMut());
}

/// [`ViewBinding`] that runs the mutation directly, with no re-render
/// machinery behind it. For headless callers and tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct DirectApply;

impl ViewBinding for DirectApply {
    fn apply(&self, mutation: &mut dyn FnMut()) {
        mutation();
    }
}
