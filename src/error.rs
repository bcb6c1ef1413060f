//! Error types for the TriageFlow client.
//!
//! Stream-internal problems (a malformed line, an `error` part from the
//! backend) are modelled as [`crate::stream::StreamEvent::Error`] and never
//! surface here; `TriageError` covers the transport and API boundary only.

use thiserror::Error;

/// Errors from the HTTP transport and non-streaming API calls.
#[derive(Debug, Error)]
pub enum TriageError {
    /// HTTP request failed (connection, DNS, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server returned a non-success status.
    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// JSON deserialization of a non-streaming response failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
