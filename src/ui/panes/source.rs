//! Source code pane rendering with instruction highlighting
//!
//! This module renders the program being executed. Each of the eight
//! instructions gets its own color, everything else is dimmed as a comment.
//!
//! # Features
//!
//! - Instruction highlighting by category (pointer, cell, I/O, loop)
//! - The character under the program counter is drawn reversed; on a line
//!   break (a no-op position) a marker cell is drawn at the end of the line
//! - A structural error position is drawn on a red background
//! - The editing cursor while the pane is focused
//! - Line numbering, with the view following the program counter or the cursor

use crate::interpreter::engine::Instruction;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Character index of the highlighted positions in the source
#[derive(Debug, Clone, Copy, Default)]
pub struct SourceMarkers {
    /// Next instruction to execute
    pub pc: Option<usize>,
    /// Bracket that made the program invalid
    pub error: Option<usize>,
    /// Whether the VM is suspended on the `,` at `pc`
    pub awaiting_input: bool,
    /// Editing cursor, shown while the pane is focused
    pub cursor: Option<usize>,
}

fn instruction_style(c: char) -> Style {
    match Instruction::decode(c) {
        Some(Instruction::Left | Instruction::Right) => {
            Style::default().fg(DEFAULT_THEME.pointer_op)
        }
        Some(Instruction::Increment | Instruction::Decrement) => {
            Style::default().fg(DEFAULT_THEME.cell_op)
        }
        Some(Instruction::Output | Instruction::Input) => Style::default()
            .fg(DEFAULT_THEME.io_op)
            .add_modifier(Modifier::BOLD),
        Some(Instruction::LoopStart | Instruction::LoopEnd) => Style::default()
            .fg(DEFAULT_THEME.loop_op)
            .add_modifier(Modifier::BOLD),
        None => Style::default().fg(DEFAULT_THEME.comment),
    }
}

/// One displayed line of the program
#[derive(Debug, Default, PartialEq)]
struct SourceLine {
    /// `(character index, character)` for every visible character
    chars: Vec<(usize, char)>,
    /// Indices of the hidden `\r` / `\n` closing the line, or the end of text
    ends: Vec<usize>,
}

/// Split the source into lines keyed by character index.
///
/// Indices match the VM's program counter, so line breaks keep their
/// positions even though they are not displayed.
fn indexed_lines(source_code: &str) -> Vec<SourceLine> {
    let mut lines = vec![SourceLine::default()];
    let mut total = 0;
    for (idx, c) in source_code.chars().enumerate() {
        total = idx + 1;
        let Some(line) = lines.last_mut() else {
            continue;
        };
        match c {
            '\n' => {
                line.ends.push(idx);
                lines.push(SourceLine::default());
            }
            '\r' => line.ends.push(idx),
            _ => line.chars.push((idx, c)),
        }
    }
    if let Some(last) = lines.last_mut() {
        last.ends.push(total);
    }
    lines
}

/// Line (0-based) containing character `index`
fn line_of(source_code: &str, index: usize) -> usize {
    source_code
        .chars()
        .take(index)
        .filter(|&c| c == '\n')
        .count()
}

/// Apply the pc, error and cursor highlights for position `idx`
fn marked_style(base: Style, idx: usize, markers: &SourceMarkers) -> Style {
    let mut style = base;
    if markers.error == Some(idx) {
        style = Style::default()
            .bg(DEFAULT_THEME.error)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD);
    } else if markers.pc == Some(idx) {
        let bg = if markers.awaiting_input {
            DEFAULT_THEME.secondary
        } else {
            DEFAULT_THEME.primary
        };
        style = style.bg(bg).fg(Color::Black).add_modifier(Modifier::BOLD);
    }
    if markers.cursor == Some(idx) {
        style = style.add_modifier(Modifier::REVERSED | Modifier::UNDERLINED);
    }
    style
}

fn build_line(line_idx: usize, line: &SourceLine, markers: &SourceMarkers) -> Line<'static> {
    let has_pc = markers.pc.is_some_and(|pc| {
        line.chars.iter().any(|&(idx, _)| idx == pc) || line.ends.contains(&pc)
    });

    let num_style = if has_pc {
        Style::default()
            .fg(DEFAULT_THEME.secondary)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.comment)
    };

    let mut spans = vec![Span::styled(format!("{:4} ", line_idx + 1), num_style)];
    spans.extend(line.chars.iter().map(|&(idx, c)| {
        let style = marked_style(instruction_style(c), idx, markers);
        Span::styled(c.to_string(), style)
    }));

    // A marker cell for a pc or cursor sitting on the line break
    let end_mark = line
        .ends
        .iter()
        .copied()
        .find(|&idx| markers.pc == Some(idx) || markers.cursor == Some(idx));
    if let Some(idx) = end_mark {
        spans.push(Span::styled(" ", marked_style(Style::default(), idx, markers)));
    }

    let mut rendered = Line::from(spans);
    if has_pc {
        rendered = rendered.style(Style::default().bg(DEFAULT_THEME.current_line_bg));
    }
    rendered
}

/// Render the source code pane
pub fn render_source_pane(
    frame: &mut Frame,
    area: Rect,
    source_code: &str,
    markers: SourceMarkers,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let block = Block::default()
        .title(" Program ")
        .borders(Borders::ALL)
        .border_style(border_style);

    let lines = indexed_lines(source_code);
    let total_lines = lines.len();
    let visible_height = area.height.saturating_sub(2).max(1) as usize; // Account for borders

    // Follow the editing cursor while focused, otherwise the error or pc
    let follow = if is_focused {
        markers.cursor
    } else {
        markers.error.or(markers.pc)
    };
    if let Some(target) = follow {
        let line = line_of(source_code, target);
        if line < *scroll_offset {
            *scroll_offset = line;
        } else if line >= *scroll_offset + visible_height {
            *scroll_offset = line + 1 - visible_height;
        }
    }

    let max_scroll = total_lines.saturating_sub(visible_height);
    *scroll_offset = (*scroll_offset).min(max_scroll);

    let visible_lines: Vec<Line> = lines
        .iter()
        .enumerate()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(|(line_idx, line)| build_line(line_idx, line, &markers))
        .collect();

    let paragraph = Paragraph::new(visible_lines).block(block);
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indexed_lines_keep_program_positions() {
        let lines = indexed_lines("+-\r\n[.]");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].chars, vec![(0, '+'), (1, '-')]);
        assert_eq!(lines[0].ends, vec![2, 3]);
        assert_eq!(lines[1].chars, vec![(4, '['), (5, '.'), (6, ']')]);
        assert_eq!(lines[1].ends, vec![7]);
    }

    #[test]
    fn test_line_of() {
        let source = "++\n>>\n.";
        assert_eq!(line_of(source, 0), 0);
        assert_eq!(line_of(source, 3), 1);
        assert_eq!(line_of(source, 6), 2);
    }

    #[test]
    fn test_pc_on_line_break_gets_end_marker() {
        let lines = indexed_lines("+-\n>");
        let markers = SourceMarkers {
            pc: Some(2),
            ..SourceMarkers::default()
        };

        let first = build_line(0, &lines[0], &markers);
        let last = first.spans.last().unwrap();
        assert_eq!(last.content, " ");
        assert_eq!(last.style.bg, Some(DEFAULT_THEME.primary));
        assert_eq!(first.style.bg, Some(DEFAULT_THEME.current_line_bg));

        // The next line carries no marker
        let second = build_line(1, &lines[1], &markers);
        assert_eq!(second.spans.len(), 2);
        assert_eq!(second.style.bg, None);
    }

    #[test]
    fn test_cursor_at_end_of_text_is_drawn() {
        let lines = indexed_lines("+");
        let markers = SourceMarkers {
            cursor: Some(1),
            ..SourceMarkers::default()
        };
        let line = build_line(0, &lines[0], &markers);
        let last = line.spans.last().unwrap();
        assert_eq!(last.content, " ");
        assert!(last.style.add_modifier.contains(Modifier::REVERSED));
    }
}
