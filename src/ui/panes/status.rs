//! Status bar rendering with keybindings and VM state indicators

use crate::interpreter::engine::VmState;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// What the status bar shows about the current run
#[derive(Debug, Clone, Copy)]
pub struct StatusRenderData<'a> {
    pub message: &'a str,
    /// `None` when no VM exists (the program failed validation)
    pub state: Option<VmState>,
    pub program_counter: usize,
    pub program_len: usize,
    pub data_pointer: usize,
    pub executed: u64,
    /// Executing in slices after F5
    pub is_running: bool,
    pub is_playing: bool,
    pub has_error: bool,
}

/// Render the status bar at the bottom.
pub fn render_status_bar(frame: &mut Frame, area: Rect, data: StatusRenderData<'_>) {
    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    // Left side: position info and message
    let position_text = if data.state.is_some() {
        format!(
            " pc {}/{} dp {} #{} ",
            data.program_counter, data.program_len, data.data_pointer, data.executed
        )
    } else {
        " pc -/- ".to_string()
    };

    let left_spans = vec![
        Span::styled(
            position_text,
            Style::default()
                .bg(if data.has_error {
                    DEFAULT_THEME.error
                } else if data.state == Some(VmState::AwaitingInput) {
                    DEFAULT_THEME.secondary
                } else {
                    DEFAULT_THEME.primary
                })
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            " | ",
            Style::default()
                .bg(DEFAULT_THEME.current_line_bg)
                .fg(DEFAULT_THEME.comment),
        ),
        Span::styled(
            format!(" {} ", data.message),
            Style::default()
                .bg(DEFAULT_THEME.current_line_bg)
                .fg(if data.has_error {
                    DEFAULT_THEME.error
                } else {
                    DEFAULT_THEME.fg
                }),
        ),
    ];

    let left_paragraph = Paragraph::new(Line::from(left_spans))
        .style(Style::default().bg(DEFAULT_THEME.current_line_bg))
        .alignment(Alignment::Left);

    frame.render_widget(left_paragraph, layout[0]);

    // Right side: keybinds with visual grouping
    let key_style = Style::default().bg(DEFAULT_THEME.comment).fg(Color::Black);
    let desc_style = Style::default()
        .bg(DEFAULT_THEME.current_line_bg)
        .fg(DEFAULT_THEME.fg);
    let sep_style = Style::default()
        .bg(DEFAULT_THEME.current_line_bg)
        .fg(DEFAULT_THEME.comment);

    let mut right_spans = vec![
        Span::styled(" F5 ", key_style),
        Span::styled(" run ", desc_style),
        Span::styled("│", sep_style),
        Span::styled(" ", desc_style),
        Span::styled(" F6 ", key_style),
        Span::styled(" step ", desc_style),
        Span::styled("│", sep_style),
        Span::styled(" ", desc_style),
        Span::styled(" F7 ", key_style),
        Span::styled(" play ", desc_style),
        Span::styled("│", sep_style),
        Span::styled(" ", desc_style),
        Span::styled("Esc", key_style),
        Span::styled(" quit ", desc_style),
    ];

    let badge = |text: &'static str, color: Color| {
        Span::styled(
            text,
            Style::default()
                .bg(color)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        )
    };

    let indicator = match data.state {
        _ if data.has_error => Some(badge(" ERROR ", DEFAULT_THEME.error)),
        Some(VmState::AwaitingInput) => Some(badge(" ⌨ INPUT ", DEFAULT_THEME.secondary)),
        _ if data.is_running => Some(badge(" ▶ RUNNING ", DEFAULT_THEME.primary)),
        _ if data.is_playing => Some(badge(" ▶ PLAYING ", DEFAULT_THEME.secondary)),
        Some(VmState::Halted) => Some(badge(" HALTED ", DEFAULT_THEME.success)),
        Some(VmState::Ready) => Some(badge(" READY ", DEFAULT_THEME.primary)),
        _ => None,
    };

    if let Some(span) = indicator {
        right_spans.push(Span::styled("│", sep_style));
        right_spans.push(span);
    }

    let right_paragraph = Paragraph::new(Line::from(right_spans))
        .style(Style::default().bg(DEFAULT_THEME.current_line_bg))
        .alignment(Alignment::Right);

    frame.render_widget(right_paragraph, layout[1]);
}
