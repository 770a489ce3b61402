//! Outbound emissions bridged into single-resolution futures.
//!
//! [`RequestBridge::emit`] turns one fire-and-forget transport emission into
//! a [`PendingReply`]: the bridge appends its own trailing acknowledgement
//! callback to the forwarded arguments, and the callback settles the reply
//! exactly once according to the configured [`ResponseMode`].

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use serde_json::Value;
use tokio::sync::oneshot;

use super::response::{ResponseMode, is_truthy};
use crate::error::RelayError;
use crate::transport::{ReplyCallback, Transport};

/// Bridges fire-and-forget transport emissions into deferred replies.
pub struct RequestBridge {
    transport: Arc<dyn Transport>,
    mode: ResponseMode,
}

impl RequestBridge {
    /// Creates a bridge over `transport` with the given interpretation mode.
    pub(crate) fn new(transport: Arc<dyn Transport>, mode: ResponseMode) -> Self {
        Self { transport, mode }
    }

    /// Returns the configured response-interpretation mode.
    #[must_use]
    pub fn mode(&self) -> ResponseMode {
        self.mode
    }

    /// Sends `event` with `args` over the transport and returns the
    /// deferred reply.
    ///
    /// Falsy arguments are dropped from the forwarded payload entirely (no
    /// placeholders). The bridge appends the trailing acknowledgement
    /// callback itself; callers never supply one. An empty event name
    /// settles the reply with [`RelayError::MissingEventName`] without
    /// touching the transport.
    pub fn emit(&self, event: &str, args: impl IntoIterator<Item = Value>) -> PendingReply {
        let (tx, rx) = oneshot::channel();
        if event.is_empty() {
            let _ = tx.send(Err(RelayError::MissingEventName));
            return PendingReply { rx };
        }

        let payload: Vec<Value> = args.into_iter().filter(is_truthy).collect();
        let request_id = uuid::Uuid::new_v4();
        tracing::debug!(%request_id, event, args = payload.len(), "emit");

        let mode = self.mode;
        let ack: ReplyCallback = Box::new(move |reply: Vec<Value>| {
            let outcome = mode.interpret(reply);
            tracing::debug!(%request_id, ok = outcome.is_ok(), "reply settled");
            let _ = tx.send(outcome);
        });
        self.transport.emit(event, payload, ack);
        PendingReply { rx }
    }
}

impl fmt::Debug for RequestBridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestBridge")
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

/// Deferred result of one [`RequestBridge::emit`] call.
///
/// Settles exactly once: resolved with the reply payload, or rejected with
/// a [`RelayError`]. The future stays pending for as long as the transport
/// holds the acknowledgement callback without invoking it; if the transport
/// drops the callback instead, the reply settles with
/// [`RelayError::ReplyDropped`].
#[derive(Debug)]
pub struct PendingReply {
    rx: oneshot::Receiver<Result<Value, RelayError>>,
}

impl Future for PendingReply {
    type Output = Result<Value, RelayError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.rx).poll(cx) {
            Poll::Ready(Ok(outcome)) => Poll::Ready(outcome),
            Poll::Ready(Err(_)) => Poll::Ready(Err(RelayError::ReplyDropped)),
            Poll::Pending => Poll::Pending,
        }
    }
}
