//! Relay facade pairing one subscription registry and one request bridge
//! with a transport.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::bridge::{PendingReply, RequestBridge, ResponseMode};
use crate::config::RelayConfig;
use crate::registry::{EventHandle, SubscriptionRegistry};
use crate::transport::Transport;
use crate::view::{Scope, ViewBinding};

/// Subscription and emission surface over one transport.
///
/// Construct one relay per transport pairing. All subscription state is
/// owned by the relay's registry — never global — so dropping the relay and
/// its handles releases everything.
pub struct SocketRelay {
    registry: SubscriptionRegistry,
    bridge: RequestBridge,
}

impl SocketRelay {
    /// Creates a relay in raw `(error, result)` acknowledgement mode.
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>, view: Arc<dyn ViewBinding>) -> Self {
        Self::with_config(transport, view, RelayConfig::default())
    }

    /// Creates a relay with an explicit configuration.
    #[must_use]
    pub fn with_config(
        transport: Arc<dyn Transport>,
        view: Arc<dyn ViewBinding>,
        config: RelayConfig,
    ) -> Self {
        let registry = SubscriptionRegistry::new(Arc::clone(&transport), view);
        let bridge = RequestBridge::new(transport, config.response_mode);
        Self { registry, bridge }
    }

    /// Subscribes to `event` without a scope.
    ///
    /// The returned handle registers handlers via [`EventHandle::then`];
    /// nothing is attached to the transport until the first `then`.
    #[must_use]
    pub fn on(&self, event: &str) -> EventHandle {
        self.registry.subscribe(event, None)
    }

    /// Subscribes to `event` bound to `scope`.
    ///
    /// The subscription is revoked automatically when the scope is torn
    /// down, alongside every other subscription of that scope.
    #[must_use]
    pub fn on_scoped(&self, event: &str, scope: &dyn Scope) -> EventHandle {
        self.registry.subscribe(event, Some(scope))
    }

    /// Emits `event` with `args` and returns the deferred reply. See
    /// [`RequestBridge::emit`] for argument filtering and failure modes.
    pub fn emit(&self, event: &str, args: impl IntoIterator<Item = Value>) -> PendingReply {
        self.bridge.emit(event, args)
    }

    /// Returns the configured response-interpretation mode.
    #[must_use]
    pub fn response_mode(&self) -> ResponseMode {
        self.bridge.mode()
    }

    /// Current reference count (total registered handlers) for `event`.
    #[must_use]
    pub fn handler_count(&self, event: &str) -> usize {
        self.registry.handler_count(event)
    }

    /// Returns `true` while a transport listener is attached for `event`.
    #[must_use]
    pub fn is_listening(&self, event: &str) -> bool {
        self.registry.is_listening(event)
    }
}

impl fmt::Debug for SocketRelay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SocketRelay")
            .field("registry", &self.registry)
            .field("bridge", &self.bridge)
            .finish()
    }
}
