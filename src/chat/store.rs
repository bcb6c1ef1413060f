//! Owned, versioned conversation state behind a subscribe/notify interface.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::watch;

use crate::chat::reducer::{reduce, ConversationState, MessageAction};

/// An immutable snapshot of the conversation, cheap to clone and share.
pub type Snapshot = Arc<ConversationState>;

/// Monotonically increasing id distinguishing the active turn from
/// superseded ones.
pub type TurnId = u64;

/// Single owner of the conversation state.
///
/// All mutation goes through [`dispatch`](ChatStore::dispatch), which folds
/// the action with the pure reducer and publishes a fresh snapshot to all
/// subscribers. Actions are tagged with the turn they belong to; when a new
/// turn has started, dispatches from the old one are discarded, so a
/// superseded stream cannot write into the transcript.
#[derive(Debug)]
pub struct ChatStore {
    tx: watch::Sender<Snapshot>,
    turn: AtomicU64,
    version: AtomicU64,
}

impl ChatStore {
    /// Create a store holding the empty conversation.
    pub fn new() -> Self {
        let (tx, _) = watch::channel(Snapshot::default());
        Self {
            tx,
            turn: AtomicU64::new(0),
            version: AtomicU64::new(0),
        }
    }

    /// The current state snapshot.
    pub fn snapshot(&self) -> Snapshot {
        self.tx.borrow().clone()
    }

    /// Subscribe to state changes. Receivers observe snapshots, never
    /// intermediate mutation.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.tx.subscribe()
    }

    /// Number of dispatches applied so far.
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::SeqCst)
    }

    /// The id of the turn currently allowed to dispatch.
    pub fn current_turn(&self) -> TurnId {
        self.turn.load(Ordering::SeqCst)
    }

    /// Start a new turn, superseding the previous one.
    pub fn begin_turn(&self) -> TurnId {
        self.turn.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Fold an action into the state, unless its turn has been superseded.
    ///
    /// Returns whether the action was applied. The turn check runs inside
    /// the watch channel's write lock, so it is serialized with every other
    /// dispatch: a superseded task cannot pass the check and then apply its
    /// action after a newer turn has already written.
    pub fn dispatch(&self, turn: TurnId, action: &MessageAction) -> bool {
        let applied = self.tx.send_if_modified(|snapshot| {
            if turn != self.turn.load(Ordering::SeqCst) {
                return false;
            }
            *snapshot = Arc::new(reduce(snapshot, action));
            true
        });

        if applied {
            self.version.fetch_add(1, Ordering::SeqCst);
        } else {
            tracing::debug!(
                turn,
                current = self.current_turn(),
                "discarding action from superseded turn"
            );
        }
        applied
    }
}

impl Default for ChatStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::StreamEvent;

    fn chunk(data: &str) -> MessageAction {
        MessageAction::UpdateAssistant {
            part: StreamEvent::Chunk {
                data: data.to_string(),
            },
        }
    }

    #[test]
    fn dispatch_publishes_new_snapshots() {
        let store = ChatStore::new();
        let turn = store.begin_turn();

        let before = store.snapshot();
        assert!(store.dispatch(
            turn,
            &MessageAction::AddUserMessage {
                text: "hello".to_string()
            }
        ));
        let after = store.snapshot();

        assert!(before.messages.is_empty());
        assert_eq!(after.messages.len(), 1);
        assert_eq!(store.version(), 1);
    }

    #[test]
    fn stale_turn_dispatches_are_discarded() {
        let store = ChatStore::new();
        let first = store.begin_turn();
        store.dispatch(
            first,
            &MessageAction::AddUserMessage {
                text: "first".to_string(),
            },
        );
        store.dispatch(first, &MessageAction::AddAssistantPlaceholder);

        let second = store.begin_turn();
        store.dispatch(
            second,
            &MessageAction::AddUserMessage {
                text: "second".to_string(),
            },
        );
        store.dispatch(second, &MessageAction::AddAssistantPlaceholder);

        // A late event from the superseded first turn must not be folded in.
        assert!(!store.dispatch(first, &chunk("late")));

        let state = store.snapshot();
        assert_eq!(state.messages.len(), 4);
        assert_eq!(state.messages[3].text, "");
        assert!(state.messages.iter().all(|m| m.text != "late"));
    }

    #[tokio::test]
    async fn stale_dispatch_neither_mutates_nor_notifies() {
        let store = ChatStore::new();
        let first = store.begin_turn();
        store.dispatch(
            first,
            &MessageAction::AddUserMessage {
                text: "first".to_string(),
            },
        );
        store.dispatch(first, &MessageAction::AddAssistantPlaceholder);

        let second = store.begin_turn();
        store.dispatch(
            second,
            &MessageAction::AddUserMessage {
                text: "second".to_string(),
            },
        );
        store.dispatch(second, &MessageAction::AddAssistantPlaceholder);

        let mut rx = store.subscribe();
        let version_before = store.version();
        rx.borrow_and_update();

        // An event from the superseded turn that reached this dispatch (a
        // task already streaming when it was aborted) must leave the new
        // turn's placeholder untouched and wake nobody.
        assert!(!store.dispatch(first, &chunk("late")));

        assert!(!rx.has_changed().unwrap());
        assert_eq!(store.version(), version_before);
        let state = store.snapshot();
        assert_eq!(state.messages[3].text, "");
        assert!(state.messages[3].in_progress);
    }

    #[tokio::test]
    async fn subscribers_are_notified_of_changes() {
        let store = ChatStore::new();
        let mut rx = store.subscribe();
        let turn = store.begin_turn();

        store.dispatch(
            turn,
            &MessageAction::AddUserMessage {
                text: "hello".to_string(),
            },
        );

        rx.changed().await.expect("store dropped");
        assert_eq!(rx.borrow_and_update().messages.len(), 1);
    }
}
