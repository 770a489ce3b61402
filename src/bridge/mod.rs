//! Request/response layer: outbound emissions bridged into deferred replies.
//!
//! The transport's `emit` is fire-and-forget with a trailing callback. This
//! module owns that callback, settling a single-resolution [`PendingReply`]
//! per emission, and interprets the callback arguments according to the
//! [`ResponseMode`] chosen when the relay was built.

pub mod request;
pub mod response;

pub use request::{PendingReply, RequestBridge};
pub use response::ResponseMode;
