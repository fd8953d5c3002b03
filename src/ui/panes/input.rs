//! Input line: the `>>>` prompt and the bytes typed ahead of the program

use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use std::collections::VecDeque;

const PROMPT: &str = ">>> ";

/// Printable form of a queued byte
fn escape_byte(byte: u8) -> String {
    match byte {
        b'\n' => "⏎".to_string(),
        b'\t' => "\\t".to_string(),
        0x20..=0x7e => char::from(byte).to_string(),
        _ => format!("\\x{:02x}", byte),
    }
}

/// Render the input line.
///
/// `prompt_visible` is toggled by the caller to make the prompt blink while the
/// program waits for a byte.
pub fn render_input_pane(
    frame: &mut Frame,
    area: Rect,
    pending: &VecDeque<u8>,
    awaiting_input: bool,
    prompt_visible: bool,
    is_focused: bool,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else if awaiting_input {
        Style::default().fg(DEFAULT_THEME.secondary)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let block = Block::default()
        .title(" Input ")
        .borders(Borders::ALL)
        .border_style(border_style);

    let prompt = if prompt_visible {
        PROMPT.to_string()
    } else {
        " ".repeat(PROMPT.len())
    };

    let typed: String = pending.iter().map(|&b| escape_byte(b)).collect();

    let line = Line::from(vec![
        Span::styled(
            prompt,
            Style::default()
                .fg(DEFAULT_THEME.secondary)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(typed, Style::default().fg(DEFAULT_THEME.fg)),
    ]);

    frame.render_widget(Paragraph::new(line).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_byte() {
        assert_eq!(escape_byte(b'A'), "A");
        assert_eq!(escape_byte(b'\n'), "⏎");
        assert_eq!(escape_byte(0), "\\x00");
        assert_eq!(escape_byte(0xff), "\\xff");
    }
}
