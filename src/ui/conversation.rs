//! Chat transcript rendering.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use ratatui::Frame;

use crate::app::App;
use crate::chat::{ChatMessage, Sender, STREAM_PART_ERROR_TEXT, TRANSPORT_ERROR_TEXT};
use crate::ui::helpers::wrap_text;
use crate::ui::input::render_input_area;
use crate::ui::{COLOR_ACCENT, COLOR_ASSISTANT, COLOR_BORDER, COLOR_DIM, COLOR_ERROR, COLOR_USER};

const LOADING_FRAMES: &[&str] = &["●    ", "● ●  ", "● ● ●"];

pub fn render_chat_screen(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(4),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_header(frame, chunks[0]);
    render_transcript(frame, app, chunks[1]);
    render_input_area(frame, app, chunks[2]);
    render_hints(frame, chunks[3]);
}

fn render_header(frame: &mut Frame, area: Rect) {
    let title = Line::from(vec![
        Span::styled(
            " TriageFlow ",
            Style::default()
                .fg(COLOR_ACCENT)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("triage assistant", Style::default().fg(COLOR_DIM)),
    ]);
    frame.render_widget(Paragraph::new(title), area);
}

fn render_transcript(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(COLOR_BORDER));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let width = inner.width.saturating_sub(2).max(10) as usize;
    let mut lines: Vec<Line> = Vec::new();

    for message in app.snapshot.messages.iter() {
        lines.extend(message_lines(message, width, app.tick_count));
        lines.push(Line::default());
    }

    if app.snapshot.messages.is_empty() {
        lines.push(Line::from(Span::styled(
            "Describe the patient's symptoms to start the triage conversation.",
            Style::default().fg(COLOR_DIM),
        )));
    }

    let scroll_y = transcript_scroll(lines.len(), inner.height, app.scroll_offset);
    frame.render_widget(Paragraph::new(lines).scroll((scroll_y, 0)), inner);
}

/// Vertical scroll that pins the view to the bottom, offset by manual
/// scrolling. Saturates rather than truncates for very long transcripts.
fn transcript_scroll(total_lines: usize, viewport_height: u16, offset: u16) -> u16 {
    let overflow = total_lines.saturating_sub(viewport_height as usize);
    u16::try_from(overflow)
        .unwrap_or(u16::MAX)
        .saturating_sub(offset)
}

fn message_lines(message: &ChatMessage, width: usize, tick: u64) -> Vec<Line<'static>> {
    let (label, label_color) = match message.sender {
        Sender::User => ("You", COLOR_USER),
        Sender::Assistant => ("Assistant", COLOR_ASSISTANT),
    };

    let mut lines = vec![Line::from(Span::styled(
        label.to_string(),
        Style::default()
            .fg(label_color)
            .add_modifier(Modifier::BOLD),
    ))];

    if message.in_progress && message.text.is_empty() {
        let frame_idx = (tick / 3) as usize % LOADING_FRAMES.len();
        lines.push(Line::from(Span::styled(
            LOADING_FRAMES[frame_idx].to_string(),
            Style::default().fg(COLOR_DIM),
        )));
        return lines;
    }

    let text_style = if is_error_notice(&message.text) {
        Style::default().fg(COLOR_ERROR)
    } else {
        Style::default()
    };
    for wrapped in wrap_text(&message.text, width) {
        lines.push(Line::from(Span::styled(wrapped, text_style)));
    }

    for source in &message.sources {
        lines.push(Line::from(Span::styled(
            format!("  └ {} · {}", source.source, source.content_preview),
            Style::default().fg(COLOR_DIM),
        )));
    }

    lines
}

fn is_error_notice(text: &str) -> bool {
    text == STREAM_PART_ERROR_TEXT || text == TRANSPORT_ERROR_TEXT
}

fn render_hints(frame: &mut Frame, area: Rect) {
    let hints = Line::from(Span::styled(
        " Enter send · Shift+Enter newline · Tab queue · ↑/↓ scroll · Ctrl+C quit",
        Style::default().fg(COLOR_DIM),
    ));
    frame.render_widget(Paragraph::new(hints), area);
}
