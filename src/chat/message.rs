//! Chat message types.

use serde::{Deserialize, Serialize};

use crate::stream::Source;

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

/// A single message in the conversation transcript.
///
/// User messages are created complete and never change. Assistant messages
/// start as an empty in-progress placeholder and are filled incrementally
/// by the reducer until a terminal event finalizes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub text: String,
    pub sender: Sender,
    /// Retrieval sources backing an assistant answer.
    #[serde(default)]
    pub sources: Vec<Source>,
    /// True while the message is still being streamed.
    #[serde(default)]
    pub in_progress: bool,
}

impl ChatMessage {
    /// A completed user message.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender: Sender::User,
            sources: Vec::new(),
            in_progress: false,
        }
    }

    /// The empty assistant placeholder created right after a submission.
    pub fn assistant_placeholder() -> Self {
        Self {
            text: String::new(),
            sender: Sender::Assistant,
            sources: Vec::new(),
            in_progress: true,
        }
    }

    /// A completed assistant message, used for error notices appended when
    /// no placeholder exists.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender: Sender::Assistant,
            sources: Vec::new(),
            in_progress: false,
        }
    }

    /// Append a streamed text fragment.
    pub fn append_chunk(&mut self, fragment: &str) {
        self.text.push_str(fragment);
    }

    /// Mark the message as no longer streaming.
    pub fn finalize(&mut self) {
        self.in_progress = false;
    }
}
