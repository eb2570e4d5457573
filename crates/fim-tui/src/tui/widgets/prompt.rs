// Modal overlays: the quit confirmation and the draft id prompt, centered
// on top of the main layout.

use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

const QUIT_SIZE: (u16, u16) = (30, 5);
const DRAFT_INPUT_SIZE: (u16, u16) = (36, 5);

fn bold(color: Color) -> Style {
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

/// Draw a bordered dialog of `size` centered in `area`, blanking what lies
/// underneath.
fn dialog(
    frame: &mut Frame,
    area: Rect,
    size: (u16, u16),
    title: &str,
    accent: Color,
    lines: Vec<Line>,
) {
    let dialog_area = centered_rect(size.0, size.1, area);
    frame.render_widget(Clear, dialog_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(accent))
        .title(Span::styled(format!(" {title} "), bold(accent)));
    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .style(Style::default().bg(Color::Black)),
        dialog_area,
    );
}

/// Ask before leaving the board.
pub fn render_quit_confirm(frame: &mut Frame, area: Rect) {
    let line = Line::from(vec![
        Span::raw("  Leave the board? "),
        Span::styled("y", bold(Color::Green)),
        Span::raw("/"),
        Span::styled("n", bold(Color::Red)),
    ]);
    dialog(frame, area, QUIT_SIZE, "Quit", Color::Yellow, vec![line]);
}

/// Draft id prompt with the digits typed so far.
pub fn render_draft_input(frame: &mut Frame, area: Rect, input: &str) {
    let lines = vec![
        Line::from(vec![
            Span::raw("  Draft id: "),
            Span::styled(format!("{input}_"), Style::default().add_modifier(Modifier::BOLD)),
        ]),
        Line::from(Span::styled(
            "  Enter:Open | Esc:Cancel",
            Style::default().fg(Color::Gray),
        )),
    ];
    dialog(frame, area, DRAFT_INPUT_SIZE, "Open draft", Color::Cyan, lines);
}

/// A `width` x `height` rectangle centered in `area`, shrunk to fit.
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [rect] = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .areas(row);
    rect
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
