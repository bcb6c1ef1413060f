//! Streamed-chat event types and line decoding.

use serde::{Deserialize, Serialize};

/// Error text used when a line cannot be decoded as a stream event.
pub const DECODE_ERROR_MESSAGE: &str = "Error parsing JSON from stream";

/// A retrieval source attached to an assistant answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    /// Identifier of the document the answer drew from.
    pub source: String,
    /// Short preview of the matched content.
    pub content_preview: String,
}

/// One decoded record of the chat stream protocol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    /// Retrieval sources for the answer being streamed.
    Sources { data: Vec<Source> },
    /// A text fragment to append to the in-progress answer.
    Chunk { data: String },
    /// Stream finished; the payload is trailing text and is ignored.
    Done {
        #[serde(default)]
        data: String,
    },
    /// Backend-reported error.
    Error { error: String },
}

impl StreamEvent {
    /// Event type name for diagnostics.
    pub fn event_type_name(&self) -> &'static str {
        match self {
            StreamEvent::Sources { .. } => "sources",
            StreamEvent::Chunk { .. } => "chunk",
            StreamEvent::Done { .. } => "done",
            StreamEvent::Error { .. } => "error",
        }
    }

    /// Whether this event ends the stream.
    pub fn is_terminal(&self) -> bool {
        matches!(self, StreamEvent::Done { .. } | StreamEvent::Error { .. })
    }
}

/// Decode one framed line as a [`StreamEvent`].
///
/// Total over all inputs: a line that is not well-formed JSON, or does not
/// match one of the known shapes, decodes to an `Error` event instead of
/// failing the pipeline.
pub fn decode_line(line: &str) -> StreamEvent {
    match serde_json::from_str(line) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!(error = %e, line, "failed to decode stream line");
            StreamEvent::Error {
                error: DECODE_ERROR_MESSAGE.to_string(),
            }
        }
    }
}
