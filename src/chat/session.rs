//! Drives chat turns against the backend stream.

use std::sync::{Arc, Mutex};

use futures_util::StreamExt;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::api::TriageClient;
use crate::chat::reducer::MessageAction;
use crate::chat::store::{ChatStore, Snapshot, TurnId};

/// One conversation with the triage assistant.
///
/// A submission appends the user message and the assistant placeholder in
/// the same batch, then spawns a task that folds the response stream into
/// the store. Submitting again while a stream is open supersedes it: the
/// previous task is aborted and, independently, its turn id goes stale so
/// any event already in flight is discarded at dispatch.
pub struct ChatSession {
    store: Arc<ChatStore>,
    client: Arc<TriageClient>,
    stream_task: Mutex<Option<JoinHandle<()>>>,
}

impl ChatSession {
    pub fn new(client: TriageClient) -> Self {
        Self {
            store: Arc::new(ChatStore::new()),
            client: Arc::new(client),
            stream_task: Mutex::new(None),
        }
    }

    pub fn store(&self) -> &Arc<ChatStore> {
        &self.store
    }

    /// Current conversation snapshot.
    pub fn snapshot(&self) -> Snapshot {
        self.store.snapshot()
    }

    /// Subscribe to conversation snapshots.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.store.subscribe()
    }

    /// Submit a user message and start streaming the assistant's answer.
    ///
    /// Blank input is ignored. Must be called from within a tokio runtime.
    pub fn submit(&self, query: &str) {
        let query = query.trim();
        if query.is_empty() {
            return;
        }

        if let Some(previous) = self.stream_task.lock().expect("stream task lock").take() {
            previous.abort();
        }

        let turn = self.store.begin_turn();
        tracing::debug!(turn, "starting chat turn");

        self.store.dispatch(
            turn,
            &MessageAction::AddUserMessage {
                text: query.to_string(),
            },
        );
        self.store
            .dispatch(turn, &MessageAction::AddAssistantPlaceholder);

        let handle = tokio::spawn(run_turn(
            Arc::clone(&self.store),
            Arc::clone(&self.client),
            turn,
            query.to_string(),
        ));
        *self.stream_task.lock().expect("stream task lock") = Some(handle);
    }
}

/// Consume one response stream, folding every item into the store.
///
/// Transport failures become the transport-error action; the completion
/// sentinel is always dispatched last.
async fn run_turn(store: Arc<ChatStore>, client: Arc<TriageClient>, turn: TurnId, query: String) {
    match client.chat_stream(&query).await {
        Ok(mut events) => {
            while let Some(item) = events.next().await {
                let applied = match item {
                    Ok(part) => store.dispatch(turn, &MessageAction::UpdateAssistant { part }),
                    Err(e) => {
                        store.dispatch(
                            turn,
                            &MessageAction::HandleStreamError {
                                error: e.to_string(),
                            },
                        );
                        break;
                    }
                };
                if !applied {
                    // Turn superseded mid-stream; stop reading.
                    return;
                }
            }
        }
        Err(e) => {
            store.dispatch(
                turn,
                &MessageAction::HandleStreamError {
                    error: e.to_string(),
                },
            );
        }
    }

    store.dispatch(turn, &MessageAction::StreamCompleted);
    tracing::debug!(turn, "chat turn finished");
}
