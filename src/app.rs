//! Application state for the TUI.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::api::TriageClient;
use crate::chat::{ChatSession, Snapshot};
use crate::config::AppConfig;
use crate::models::{demo_queue, PatientQueueItem};

/// Which screen is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Chat,
    Queue,
}

/// Top-level application state.
pub struct App {
    pub session: ChatSession,
    /// Latest conversation snapshot, refreshed from the store's watch
    /// channel by the event loop.
    pub snapshot: Snapshot,
    pub input: String,
    pub screen: Screen,
    /// Lines scrolled up from the bottom of the transcript.
    pub scroll_offset: u16,
    pub tick_count: u64,
    pub should_quit: bool,
    pub queue: Vec<PatientQueueItem>,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        let session = ChatSession::new(TriageClient::new(config));
        let snapshot = session.snapshot();
        Self {
            session,
            snapshot,
            input: String::new(),
            screen: Screen::Chat,
            scroll_offset: 0,
            tick_count: 0,
            should_quit: false,
            queue: demo_queue(),
        }
    }

    /// Whether a turn is currently in flight.
    pub fn is_loading(&self) -> bool {
        self.snapshot.is_loading()
    }

    /// Animation tick, driven by the event loop.
    pub fn tick(&mut self) {
        self.tick_count = self.tick_count.wrapping_add(1);
    }

    /// Adopt a fresh snapshot and snap the transcript to the bottom.
    pub fn set_snapshot(&mut self, snapshot: Snapshot) {
        self.snapshot = snapshot;
        self.scroll_offset = 0;
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Tab => {
                self.screen = match self.screen {
                    Screen::Chat => Screen::Queue,
                    Screen::Queue => Screen::Chat,
                };
            }
            KeyCode::Enter if key.modifiers.contains(KeyModifiers::SHIFT) => {
                if self.screen == Screen::Chat {
                    self.input.push('\n');
                }
            }
            KeyCode::Enter => {
                if self.screen == Screen::Chat {
                    self.submit_input();
                }
            }
            KeyCode::Backspace => {
                if self.screen == Screen::Chat {
                    self.input.pop();
                }
            }
            KeyCode::Up => {
                self.scroll_offset = self.scroll_offset.saturating_add(1);
            }
            KeyCode::Down => {
                self.scroll_offset = self.scroll_offset.saturating_sub(1);
            }
            KeyCode::Char(c) => {
                if self.screen == Screen::Chat {
                    self.input.push(c);
                }
            }
            _ => {}
        }
    }

    /// Send the current input as a chat turn.
    fn submit_input(&mut self) {
        let query = self.input.trim().to_string();
        if query.is_empty() {
            return;
        }
        self.input.clear();
        self.scroll_offset = 0;
        self.session.submit(&query);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEvent;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn typing_fills_the_input_buffer() {
        let mut app = App::new(AppConfig::new());
        app.handle_key(key(KeyCode::Char('h')));
        app.handle_key(key(KeyCode::Char('i')));
        assert_eq!(app.input, "hi");

        app.handle_key(key(KeyCode::Backspace));
        assert_eq!(app.input, "h");
    }

    #[test]
    fn shift_enter_inserts_a_newline() {
        let mut app = App::new(AppConfig::new());
        app.handle_key(key(KeyCode::Char('a')));
        app.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::SHIFT));
        app.handle_key(key(KeyCode::Char('b')));
        assert_eq!(app.input, "a\nb");
    }

    #[test]
    fn tab_toggles_between_chat_and_queue() {
        let mut app = App::new(AppConfig::new());
        assert_eq!(app.screen, Screen::Chat);
        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.screen, Screen::Queue);
        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.screen, Screen::Chat);
    }

    #[test]
    fn ctrl_c_quits() {
        let mut app = App::new(AppConfig::new());
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn enter_with_blank_input_submits_nothing() {
        let mut app = App::new(AppConfig::new());
        app.handle_key(key(KeyCode::Char(' ')));
        app.handle_key(key(KeyCode::Enter));
        assert!(app.session.snapshot().messages.is_empty());
    }
}
