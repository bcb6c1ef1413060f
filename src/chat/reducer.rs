//! The conversation reducer: a pure fold from actions to state snapshots.

use serde::{Deserialize, Serialize};

use crate::chat::message::{ChatMessage, Sender};
use crate::stream::StreamEvent;

/// Shown when the backend reports an error inside the stream, or a record
/// cannot be decoded.
pub const STREAM_PART_ERROR_TEXT: &str = "Error: Could not get a streamed response.";

/// Shown when the transport itself fails (connection refused, non-2xx,
/// broken stream).
pub const TRANSPORT_ERROR_TEXT: &str = "Error: Failed to connect to streaming service.";

/// An action folded into the conversation state.
#[derive(Debug, Clone, PartialEq)]
pub enum MessageAction {
    /// A user submission. Appended complete.
    AddUserMessage { text: String },
    /// The empty assistant placeholder that follows every submission.
    AddAssistantPlaceholder,
    /// A decoded stream event for the active placeholder.
    UpdateAssistant { part: StreamEvent },
    /// The transport failed; the turn ends with an error notice.
    HandleStreamError { error: String },
    /// Sentinel dispatched after the underlying stream ends, successfully
    /// or otherwise. Safety net for a `done` that never arrived.
    StreamCompleted,
}

/// Immutable snapshot of the conversation.
///
/// `active_assistant_index`, when set, points at the one message currently
/// in progress; it is cleared exactly when that message finalizes or a new
/// user message is appended.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversationState {
    pub messages: Vec<ChatMessage>,
    pub active_assistant_index: Option<usize>,
}

impl ConversationState {
    /// The empty conversation.
    pub fn new() -> Self {
        Self::default()
    }

    /// The in-progress assistant message, if any.
    pub fn active_assistant(&self) -> Option<&ChatMessage> {
        self.active_assistant_index
            .and_then(|idx| self.messages.get(idx))
    }

    /// Derived loading flag: true from the moment a user message is
    /// submitted until the turn's first terminal action.
    ///
    /// Not stored: a turn is in flight exactly when the transcript ends in
    /// an unanswered user message or an in-progress placeholder.
    pub fn is_loading(&self) -> bool {
        if self.active_assistant().is_some_and(|msg| msg.in_progress) {
            return true;
        }
        self.messages
            .last()
            .is_some_and(|msg| msg.sender == Sender::User)
    }
}

/// Fold one action into the state, producing a new snapshot.
///
/// Content events with no valid active placeholder are a protocol
/// violation; they are logged and leave the state unchanged.
pub fn reduce(state: &ConversationState, action: &MessageAction) -> ConversationState {
    match action {
        MessageAction::AddUserMessage { text } => add_user_message(state, text),
        MessageAction::AddAssistantPlaceholder => add_assistant_placeholder(state),
        MessageAction::UpdateAssistant { part } => update_assistant(state, part),
        MessageAction::HandleStreamError { error } => handle_stream_error(state, error),
        MessageAction::StreamCompleted => handle_stream_completed(state),
    }
}

fn add_user_message(state: &ConversationState, text: &str) -> ConversationState {
    let mut next = state.clone();
    // A still-streaming placeholder from a superseded turn finalizes here,
    // keeping at most one message in progress.
    if let Some(active) = active_index(&next) {
        next.messages[active].finalize();
    }
    next.messages.push(ChatMessage::user(text));
    next.active_assistant_index = None;
    next
}

fn add_assistant_placeholder(state: &ConversationState) -> ConversationState {
    let mut next = state.clone();
    next.active_assistant_index = Some(next.messages.len());
    next.messages.push(ChatMessage::assistant_placeholder());
    next
}

fn update_assistant(state: &ConversationState, part: &StreamEvent) -> ConversationState {
    let Some(active) = active_index(state) else {
        tracing::warn!(
            part = part.event_type_name(),
            "stream event with no active assistant message"
        );
        return state.clone();
    };

    let mut next = state.clone();
    let msg = &mut next.messages[active];
    match part {
        StreamEvent::Sources { data } => {
            msg.sources = data.clone();
        }
        StreamEvent::Chunk { data } => {
            msg.append_chunk(data);
        }
        StreamEvent::Done { .. } => {
            msg.finalize();
            next.active_assistant_index = None;
        }
        StreamEvent::Error { error } => {
            tracing::warn!(error = %error, "error part in stream");
            msg.text = STREAM_PART_ERROR_TEXT.to_string();
            msg.finalize();
            next.active_assistant_index = None;
        }
    }
    next
}

fn handle_stream_error(state: &ConversationState, error: &str) -> ConversationState {
    tracing::warn!(error, "stream transport failed");
    let mut next = state.clone();
    match active_index(&next) {
        Some(active) => {
            let msg = &mut next.messages[active];
            msg.text = TRANSPORT_ERROR_TEXT.to_string();
            msg.finalize();
            next.active_assistant_index = None;
        }
        None => {
            next.messages.push(ChatMessage::assistant(TRANSPORT_ERROR_TEXT));
        }
    }
    next
}

fn handle_stream_completed(state: &ConversationState) -> ConversationState {
    let Some(active) = active_index(state) else {
        return state.clone();
    };

    let mut next = state.clone();
    if next.messages[active].in_progress {
        next.messages[active].finalize();
    }
    next.active_assistant_index = None;
    next
}

/// The active index, validated against the message list.
fn active_index(state: &ConversationState) -> Option<usize> {
    let idx = state.active_assistant_index?;
    if idx < state.messages.len() {
        Some(idx)
    } else {
        tracing::warn!(idx, "active assistant index out of bounds");
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::Source;

    fn run(actions: &[MessageAction]) -> ConversationState {
        actions.iter().fold(ConversationState::new(), |state, action| {
            reduce(&state, action)
        })
    }

    fn chunk(data: &str) -> MessageAction {
        MessageAction::UpdateAssistant {
            part: StreamEvent::Chunk {
                data: data.to_string(),
            },
        }
    }

    fn done() -> MessageAction {
        MessageAction::UpdateAssistant {
            part: StreamEvent::Done {
                data: String::new(),
            },
        }
    }

    #[test]
    fn submit_appends_user_message_and_clears_pointer() {
        let state = run(&[MessageAction::AddUserMessage {
            text: "hello".to_string(),
        }]);
        assert_eq!(state.messages.len(), 1);
        assert_eq!(state.messages[0].text, "hello");
        assert_eq!(state.messages[0].sender, Sender::User);
        assert_eq!(state.active_assistant_index, None);
    }

    #[test]
    fn placeholder_sets_active_pointer() {
        let state = run(&[
            MessageAction::AddUserMessage {
                text: "hello".to_string(),
            },
            MessageAction::AddAssistantPlaceholder,
        ]);
        assert_eq!(state.messages.len(), 2);
        assert_eq!(state.active_assistant_index, Some(1));
        assert!(state.messages[1].in_progress);
        assert!(state.messages[1].text.is_empty());
    }

    #[test]
    fn full_turn_streams_chunks_then_finalizes() {
        let state = run(&[
            MessageAction::AddUserMessage {
                text: "hello".to_string(),
            },
            MessageAction::AddAssistantPlaceholder,
            chunk("Hi"),
            chunk(" there"),
            done(),
        ]);

        assert_eq!(state.messages.len(), 2);
        assert_eq!(state.messages[1].text, "Hi there");
        assert!(!state.messages[1].in_progress);
        assert_eq!(state.active_assistant_index, None);
    }

    #[test]
    fn sources_replace_the_list_on_the_active_message() {
        let sources = vec![Source {
            source: "protocol.md".to_string(),
            content_preview: "ESI levels".to_string(),
        }];
        let state = run(&[
            MessageAction::AddUserMessage {
                text: "q".to_string(),
            },
            MessageAction::AddAssistantPlaceholder,
            MessageAction::UpdateAssistant {
                part: StreamEvent::Sources {
                    data: sources.clone(),
                },
            },
            chunk("answer"),
        ]);
        assert_eq!(state.messages[1].sources, sources);
        assert_eq!(state.messages[1].text, "answer");
    }

    #[test]
    fn error_part_overwrites_text_with_generic_notice() {
        let state = run(&[
            MessageAction::AddUserMessage {
                text: "q".to_string(),
            },
            MessageAction::AddAssistantPlaceholder,
            chunk("partial"),
            MessageAction::UpdateAssistant {
                part: StreamEvent::Error {
                    error: "model overloaded".to_string(),
                },
            },
        ]);
        assert_eq!(state.messages[1].text, STREAM_PART_ERROR_TEXT);
        assert!(!state.messages[1].in_progress);
        assert_eq!(state.active_assistant_index, None);
    }

    #[test]
    fn transport_error_finalizes_active_placeholder() {
        let state = run(&[
            MessageAction::AddUserMessage {
                text: "x".to_string(),
            },
            MessageAction::AddAssistantPlaceholder,
            MessageAction::HandleStreamError {
                error: "timeout".to_string(),
            },
        ]);
        assert_eq!(state.messages.len(), 2);
        assert_eq!(state.messages[1].text, TRANSPORT_ERROR_TEXT);
        assert!(!state.messages[1].in_progress);
        assert_eq!(state.active_assistant_index, None);
    }

    #[test]
    fn transport_error_without_placeholder_appends_notice() {
        let state = run(&[MessageAction::HandleStreamError {
            error: "connection refused".to_string(),
        }]);
        assert_eq!(state.messages.len(), 1);
        assert_eq!(state.messages[0].sender, Sender::Assistant);
        assert_eq!(state.messages[0].text, TRANSPORT_ERROR_TEXT);
    }

    #[test]
    fn stream_completed_is_the_safety_net_for_a_missing_done() {
        let state = run(&[
            MessageAction::AddUserMessage {
                text: "q".to_string(),
            },
            MessageAction::AddAssistantPlaceholder,
            chunk("partial answer"),
            MessageAction::StreamCompleted,
        ]);
        assert_eq!(state.messages[1].text, "partial answer");
        assert!(!state.messages[1].in_progress);
        assert_eq!(state.active_assistant_index, None);
    }

    #[test]
    fn stream_completed_after_done_is_a_no_op() {
        let terminal = run(&[
            MessageAction::AddUserMessage {
                text: "q".to_string(),
            },
            MessageAction::AddAssistantPlaceholder,
            chunk("a"),
            done(),
        ]);
        let after = reduce(&terminal, &MessageAction::StreamCompleted);
        assert_eq!(after, terminal);
    }

    #[test]
    fn content_event_without_placeholder_is_ignored() {
        let before = run(&[MessageAction::AddUserMessage {
            text: "hello".to_string(),
        }]);
        let after = reduce(&before, &chunk("stray"));
        assert_eq!(after, before);
    }

    #[test]
    fn replay_is_deterministic() {
        let actions = vec![
            MessageAction::AddUserMessage {
                text: "hello".to_string(),
            },
            MessageAction::AddAssistantPlaceholder,
            chunk("Hi"),
            chunk(" there"),
            done(),
            MessageAction::StreamCompleted,
        ];
        assert_eq!(run(&actions), run(&actions));
    }

    #[test]
    fn at_most_one_message_in_progress_across_a_superseding_submit() {
        // Turn 1 never finishes; turn 2 submits while its placeholder is
        // still streaming.
        let state = run(&[
            MessageAction::AddUserMessage {
                text: "first".to_string(),
            },
            MessageAction::AddAssistantPlaceholder,
            chunk("partial"),
            MessageAction::AddUserMessage {
                text: "second".to_string(),
            },
            MessageAction::AddAssistantPlaceholder,
        ]);

        let in_progress = state.messages.iter().filter(|m| m.in_progress).count();
        assert_eq!(in_progress, 1);
        assert_eq!(state.active_assistant_index, Some(3));
        // The abandoned placeholder keeps its partial text but is final.
        assert_eq!(state.messages[1].text, "partial");
        assert!(!state.messages[1].in_progress);
    }

    #[test]
    fn loading_is_derived_from_the_turn_lifecycle() {
        let mut state = ConversationState::new();
        assert!(!state.is_loading());

        state = reduce(
            &state,
            &MessageAction::AddUserMessage {
                text: "q".to_string(),
            },
        );
        assert!(state.is_loading());

        state = reduce(&state, &MessageAction::AddAssistantPlaceholder);
        assert!(state.is_loading());

        state = reduce(&state, &chunk("streaming"));
        assert!(state.is_loading());

        state = reduce(&state, &MessageAction::StreamCompleted);
        assert!(!state.is_loading());
    }

    #[test]
    fn loading_ends_on_transport_error_without_placeholder() {
        let mut state = reduce(
            &ConversationState::new(),
            &MessageAction::AddUserMessage {
                text: "q".to_string(),
            },
        );
        assert!(state.is_loading());

        state = reduce(
            &state,
            &MessageAction::HandleStreamError {
                error: "refused".to_string(),
            },
        );
        assert!(!state.is_loading());
    }
}
