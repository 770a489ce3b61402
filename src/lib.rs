//! # socket-relay
//!
//! Scoped event subscriptions and request/response bridging over a
//! bidirectional socket transport.
//!
//! Many independent view components can watch the same named event. The
//! relay attaches exactly one transport-level listener per event name, fans
//! incoming events out to every subscriber, and revokes a component's
//! subscriptions automatically when its scope is torn down — without
//! leaking listeners on the underlying connection. Outbound emissions are
//! bridged into single-resolution futures, interpreted either as raw
//! `(error, result)` acknowledgements or as HTTP-shaped response objects.
//!
//! ## Architecture
//!
//! ```text
//! View components (scopes)
//!     │
//!     ├── EventHandle (registry/)       per-(event, scope) session
//!     ├── SubscriptionRegistry          refcounts + fan-out dispatch
//!     │
//!     ├── RequestBridge (bridge/)       emit → PendingReply
//!     ├── ResponseMode                  raw (err, res) | HTTP status
//!     │
//!     └── Transport (transport.rs)      on / remove_listener / emit
//! ```
//!
//! The transport and the view framework are collaborators behind traits
//! ([`transport::Transport`], [`view::ViewBinding`], [`view::Scope`]); this
//! crate is a coordination layer, not a socket implementation.

pub mod bridge;
pub mod config;
pub mod error;
pub mod registry;
pub mod relay;
pub mod transport;
pub mod view;

#[cfg(test)]
pub(crate) mod testing;
