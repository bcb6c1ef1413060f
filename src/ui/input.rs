//! Input box rendering.

use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use ratatui::Frame;

use crate::app::App;
use crate::ui::{COLOR_ACCENT, COLOR_BORDER, COLOR_DIM};

pub fn render_input_area(frame: &mut Frame, app: &App, area: Rect) {
    let title = if app.is_loading() {
        " Message (waiting for assistant…) "
    } else {
        " Message "
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(COLOR_BORDER))
        .title(Span::styled(title, Style::default().fg(COLOR_DIM)));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    // Show the tail of the input when it exceeds the visible width.
    let visible_width = inner.width.saturating_sub(1) as usize;
    let last_line = app.input.split('\n').next_back().unwrap_or("");
    let shown: String = if last_line.chars().count() > visible_width {
        last_line
            .chars()
            .skip(last_line.chars().count() - visible_width)
            .collect()
    } else {
        last_line.to_string()
    };

    let cursor = if app.tick_count % 8 < 4 { "█" } else { " " };
    let line = Line::from(vec![
        Span::raw(shown),
        Span::styled(cursor, Style::default().add_modifier(Modifier::SLOW_BLINK)),
    ]);
    frame.render_widget(
        Paragraph::new(line).style(Style::default().fg(COLOR_ACCENT)),
        inner,
    );
}
