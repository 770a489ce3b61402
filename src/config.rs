//! Relay configuration.
//!
//! Follows 12-factor style: the response-interpretation mode can come from
//! an environment variable, with raw mode as the code default.

use crate::bridge::ResponseMode;

/// Top-level relay configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct RelayConfig {
    /// How trailing acknowledgement callbacks are interpreted: raw
    /// `(error, result)` pairs, or single HTTP-shaped response objects.
    pub response_mode: ResponseMode,
}

impl RelayConfig {
    /// Loads configuration from environment variables.
    ///
    /// `RELAY_RESPONSE_MODE` accepts `"raw"` or `"http"` (case-insensitive);
    /// missing or unrecognized values fall back to raw mode.
    #[must_use]
    pub fn from_env() -> Self {
        let mode = std::env::var("RELAY_RESPONSE_MODE").ok();
        Self {
            response_mode: parse_mode(mode.as_deref()),
        }
    }
}

/// Parses a response-mode string, defaulting to raw.
fn parse_mode(value: Option<&str>) -> ResponseMode {
    match value.map(str::to_ascii_lowercase).as_deref() {
        Some("http") => ResponseMode::Http,
        _ => ResponseMode::Raw,
    }
}
