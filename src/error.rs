//! Relay error types with HTTP status-text mapping.
//!
//! [`RelayError`] is the central error type for emission failures. Every
//! failure path of the request/response bridge settles the deferred reply
//! with one of these variants; the raw transport response is attached
//! wherever one exists so callers can inspect it.

use serde_json::Value;

/// Reason phrase used when the status table has no entry for a code.
const INVALID_CODE: &str = "Invalid Code";

/// Central error type for subscription and emission failures.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// `emit` was called with an empty event name. The transport was never
    /// invoked.
    #[error("no event passed through")]
    MissingEventName,

    /// HTTP-mode reply carried no parsable status code.
    #[error("invalid response format")]
    MalformedResponse {
        /// Raw reply as received from the transport.
        response: Value,
    },

    /// HTTP-mode reply had a success status code but no `data` field.
    #[error("response data isn't defined")]
    DataUndefined {
        /// Raw reply as received from the transport.
        response: Value,
    },

    /// HTTP-mode reply carried a non-success status code.
    #[error("{text}")]
    Status {
        /// Parsed status code.
        code: i64,
        /// Canonical reason phrase, or `"Invalid Code"` when unmapped.
        text: String,
        /// Raw reply as received from the transport.
        response: Value,
    },

    /// Raw-mode reply carried a truthy error argument; the argument is
    /// attached verbatim.
    #[error("upstream error: {0}")]
    Upstream(Value),

    /// The transport dropped the acknowledgement callback without ever
    /// invoking it.
    #[error("reply callback dropped before it was invoked")]
    ReplyDropped,
}

impl RelayError {
    /// Builds a [`RelayError::Status`] for `code`, looking up the canonical
    /// reason phrase and falling back to `"Invalid Code"` for codes the
    /// status table does not know.
    #[must_use]
    pub fn from_status(code: i64, response: Value) -> Self {
        let text = u16::try_from(code)
            .ok()
            .and_then(|c| http::StatusCode::from_u16(c).ok())
            .and_then(|status| status.canonical_reason())
            .unwrap_or(INVALID_CODE)
            .to_string();
        Self::Status {
            code,
            text,
            response,
        }
    }

    /// Returns the raw transport response attached to this error, if any.
    #[must_use]
    pub fn response(&self) -> Option<&Value> {
        match self {
            Self::MalformedResponse { response }
            | Self::DataUndefined { response }
            | Self::Status { response, .. } => Some(response),
            Self::Upstream(value) => Some(value),
            Self::MissingEventName | Self::ReplyDropped => None,
        }
    }
}
