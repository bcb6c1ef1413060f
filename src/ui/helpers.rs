//! Rendering helpers.

use unicode_width::UnicodeWidthChar;

/// Greedy word wrap respecting display width.
///
/// Existing newlines are kept as paragraph breaks; a single word wider
/// than the target width is hard-broken.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![String::new()];
    }

    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut current = String::new();
        let mut current_width = 0usize;

        for word in paragraph.split_whitespace() {
            let word_width = display_width(word);

            if word_width > width {
                // Flush what we have and hard-break the oversized word.
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                    current_width = 0;
                }
                let mut piece = String::new();
                let mut piece_width = 0;
                for ch in word.chars() {
                    let ch_width = ch.width().unwrap_or(0);
                    if piece_width + ch_width > width && !piece.is_empty() {
                        lines.push(std::mem::take(&mut piece));
                        piece_width = 0;
                    }
                    piece.push(ch);
                    piece_width += ch_width;
                }
                current = piece;
                current_width = piece_width;
                continue;
            }

            let needed = if current.is_empty() {
                word_width
            } else {
                word_width + 1
            };
            if current_width + needed > width && !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                current_width = 0;
            }
            if !current.is_empty() {
                current.push(' ');
                current_width += 1;
            }
            current.push_str(word);
            current_width += word_width;
        }

        lines.push(current);
    }

    lines
}

fn display_width(s: &str) -> usize {
    s.chars().map(|c| c.width().unwrap_or(0)).sum()
}
