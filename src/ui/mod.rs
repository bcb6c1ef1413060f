//! UI rendering for the TriageFlow terminal client.
//!
//! Minimal dark theme: a chat transcript with an input box at the bottom,
//! and a patient-queue panel on a second screen.

mod conversation;
mod helpers;
mod input;
mod queue;

use ratatui::style::Color;
use ratatui::Frame;

use crate::app::{App, Screen};

pub use helpers::wrap_text;

/// Primary border color.
pub const COLOR_BORDER: Color = Color::DarkGray;

/// Accent color for highlights.
pub const COLOR_ACCENT: Color = Color::White;

/// User message label color.
pub const COLOR_USER: Color = Color::Cyan;

/// Assistant message label color.
pub const COLOR_ASSISTANT: Color = Color::LightGreen;

/// Dim text for secondary info (sources, hints, clock).
pub const COLOR_DIM: Color = Color::DarkGray;

/// Error notice color.
pub const COLOR_ERROR: Color = Color::Red;

/// Render the UI based on the current screen.
pub fn render(frame: &mut Frame, app: &App) {
    match app.screen {
        Screen::Chat => conversation::render_chat_screen(frame, app),
        Screen::Queue => queue::render_queue_screen(frame, app),
    }
}
