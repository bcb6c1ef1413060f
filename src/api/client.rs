//! HTTP client with streaming chat support.

use std::collections::VecDeque;
use std::pin::Pin;

use futures_util::stream::{self, Stream};
use futures_util::{StreamExt, TryStreamExt};
use reqwest::Client;

use crate::api::models::{ChatStreamRequest, StartIntakeRequest, StartIntakeResponse};
use crate::config::AppConfig;
use crate::error::TriageError;
use crate::stream::{decode_line, LineFramer, StreamEvent};

/// A stream of decoded chat events.
///
/// The stream ends after yielding a terminal item: a `done` part, an
/// `error` part, or a transport `Err`. Transport failures are always
/// delivered as an item rather than a panic or a silent stop, so the
/// consumer can fold them into the conversation.
pub type EventStream = Pin<Box<dyn Stream<Item = Result<StreamEvent, TriageError>> + Send>>;

/// Client for the TriageFlow backend API.
pub struct TriageClient {
    config: AppConfig,
    client: Client,
}

impl TriageClient {
    /// Create a client from an explicit configuration.
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Open a chat stream for one query.
    ///
    /// Sends `POST /chat_stream` and decodes the progressively delivered
    /// newline-delimited JSON body into [`StreamEvent`]s. Each call opens a
    /// new connection; the returned stream is not restartable.
    ///
    /// A non-success status is returned as `Err` before any event is
    /// yielded; a failure while reading the body surfaces as a terminal
    /// `Err` item on the stream.
    pub async fn chat_stream(&self, query: &str) -> Result<EventStream, TriageError> {
        let url = self.config.url_for("chat_stream");

        let response = self
            .client
            .post(&url)
            .json(&ChatStreamRequest::new(query))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(TriageError::Server { status, message });
        }

        let bytes = Box::pin(response.bytes_stream().map_err(TriageError::from));
        Ok(Box::pin(stream::unfold(
            ChatStreamState::new(bytes),
            next_event,
        )))
    }

    /// Run the patient intake agent over a conversation transcript.
    pub async fn start_intake(
        &self,
        conversation: &str,
    ) -> Result<StartIntakeResponse, TriageError> {
        let url = self.config.url_for("agents/patient/intake");

        let response = self
            .client
            .post(&url)
            .json(&StartIntakeRequest {
                conversation: conversation.to_string(),
            })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(TriageError::Server { status, message });
        }

        Ok(response.json().await?)
    }
}

type BytesStream = Pin<Box<dyn Stream<Item = Result<bytes::Bytes, TriageError>> + Send>>;

struct ChatStreamState {
    bytes: BytesStream,
    framer: LineFramer,
    /// Raw bytes whose trailing part may be an incomplete UTF-8 sequence.
    /// A codepoint split across network chunks stays here until its
    /// continuation bytes arrive.
    undecoded: Vec<u8>,
    /// Full text received so far; the framer's cursor tracks what has been
    /// sliced into lines.
    cumulative: String,
    /// Decoded events not yet handed to the consumer.
    pending: VecDeque<StreamEvent>,
    source_ended: bool,
    finished: bool,
}

impl ChatStreamState {
    fn new(bytes: BytesStream) -> Self {
        Self {
            bytes,
            framer: LineFramer::new(),
            undecoded: Vec::new(),
            cumulative: String::new(),
            pending: VecDeque::new(),
            source_ended: false,
            finished: false,
        }
    }
}

/// Move every complete UTF-8 sequence from `buf` into `out`.
///
/// An incomplete multibyte sequence at the end of `buf` is left in place
/// for the next chunk to complete; bytes that can never form a valid
/// sequence become a replacement character so the decode cannot stall.
fn drain_complete_utf8(buf: &mut Vec<u8>, out: &mut String) {
    loop {
        match std::str::from_utf8(buf) {
            Ok(text) => {
                out.push_str(text);
                buf.clear();
                return;
            }
            Err(e) => {
                let valid = e.valid_up_to();
                out.push_str(&String::from_utf8_lossy(&buf[..valid]));
                match e.error_len() {
                    Some(invalid) => {
                        out.push(char::REPLACEMENT_CHARACTER);
                        buf.drain(..valid + invalid);
                    }
                    None => {
                        // Incomplete trailing sequence; wait for more bytes.
                        buf.drain(..valid);
                        return;
                    }
                }
            }
        }
    }
}

/// Produce the next event for `stream::unfold`.
async fn next_event(
    mut state: ChatStreamState,
) -> Option<(Result<StreamEvent, TriageError>, ChatStreamState)> {
    loop {
        if state.finished {
            return None;
        }

        if let Some(part) = state.pending.pop_front() {
            if part.is_terminal() {
                state.finished = true;
            }
            return Some((Ok(part), state));
        }

        if state.source_ended {
            return None;
        }

        match state.bytes.next().await {
            Some(Ok(chunk)) => {
                state.undecoded.extend_from_slice(&chunk);
                drain_complete_utf8(&mut state.undecoded, &mut state.cumulative);
                for line in state.framer.drain_lines(&state.cumulative) {
                    state.pending.push_back(decode_line(&line));
                }
            }
            Some(Err(e)) => {
                state.finished = true;
                return Some((Err(e), state));
            }
            None => {
                state.source_ended = true;
                // A sequence still incomplete at end of stream is garbage.
                if !state.undecoded.is_empty() {
                    state
                        .cumulative
                        .push_str(&String::from_utf8_lossy(&state.undecoded));
                    state.undecoded.clear();
                }
                for line in state.framer.drain_lines(&state.cumulative) {
                    state.pending.push_back(decode_line(&line));
                }
                if let Some(line) = state.framer.flush(&state.cumulative) {
                    state.pending.push_back(decode_line(&line));
                }
            }
        }
    }
}
