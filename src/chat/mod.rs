//! Conversation state: messages, the pure reducer, and the store that owns
//! versioned snapshots.

mod message;
mod reducer;
mod session;
mod store;

pub use message::{ChatMessage, Sender};
pub use reducer::{
    reduce, ConversationState, MessageAction, STREAM_PART_ERROR_TEXT, TRANSPORT_ERROR_TEXT,
};
pub use session::ChatSession;
pub use store::{ChatStore, Snapshot, TurnId};
