//! Patient queue panel.

use chrono::Local;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use ratatui::Frame;

use crate::app::App;
use crate::models::QueueSeverity;
use crate::ui::{COLOR_ACCENT, COLOR_BORDER, COLOR_DIM};

pub fn render_queue_screen(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_header(frame, chunks[0]);
    render_queue(frame, app, chunks[1]);
    render_hints(frame, chunks[2]);
}

fn render_header(frame: &mut Frame, area: Rect) {
    let clock = Local::now().format("%H:%M").to_string();
    let title = Line::from(vec![
        Span::styled(
            " Patient queue ",
            Style::default()
                .fg(COLOR_ACCENT)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(clock, Style::default().fg(COLOR_DIM)),
    ]);
    frame.render_widget(Paragraph::new(title), area);
}

fn render_queue(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(COLOR_BORDER));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines: Vec<Line> = Vec::new();
    for item in &app.queue {
        lines.push(Line::from(vec![
            Span::styled(
                format!("● {} ", item.severity.label()),
                Style::default()
                    .fg(severity_color(item.severity))
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(item.name.clone(), Style::default().fg(COLOR_ACCENT)),
        ]));
        lines.push(Line::from(Span::styled(
            format!("    {}", item.description),
            Style::default().fg(COLOR_DIM),
        )));
        lines.push(Line::default());
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Color per Emergency Severity Index level, most urgent first.
fn severity_color(severity: QueueSeverity) -> Color {
    match severity {
        QueueSeverity::Esi1 => Color::Red,
        QueueSeverity::Esi2 => Color::LightRed,
        QueueSeverity::Esi3 => Color::Yellow,
        QueueSeverity::Esi4 => Color::Green,
        QueueSeverity::Esi5 => Color::Blue,
    }
}

fn render_hints(frame: &mut Frame, area: Rect) {
    let hints = Line::from(Span::styled(
        " Tab chat · Ctrl+C quit",
        Style::default().fg(COLOR_DIM),
    ));
    frame.render_widget(Paragraph::new(hints), area);
}
