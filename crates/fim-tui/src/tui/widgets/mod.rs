// TUI widget modules for each dashboard panel.

pub mod available;
pub mod draft_board;
pub mod event_data;
pub mod league_weeks;
pub mod leagues;
pub mod prompt;
pub mod rankings;
pub mod rosters;
pub mod scores;
pub mod status_bar;
pub mod summary;
pub mod waivers;

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use fim_core::board::WeekSelection;

use crate::protocol::SectionState;

/// Return the section's value, or draw a bordered "Loading…" / error box in
/// its place and return `None`.
pub fn ready_or_placeholder<'a, T>(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    section: &'a SectionState<T>,
) -> Option<&'a T> {
    let (text, style) = match section {
        SectionState::Ready(value) => return Some(value),
        SectionState::Loading => ("Loading…".to_string(), Style::default().fg(Color::Gray)),
        SectionState::Failed(message) => (
            format!("Failed to load: {message}"),
            Style::default().fg(Color::Red),
        ),
    };
    let paragraph = Paragraph::new(Line::from(Span::styled(text, style)))
        .block(Block::default().borders(Borders::ALL).title(title.to_string()))
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
    None
}

/// Checkbox row for week filtering, e.g. `Weeks: [x]1 [ ]2 ...`. The option
/// under the cursor is highlighted.
pub fn week_selector_line(
    options: &[u32],
    selected: &WeekSelection,
    cursor: usize,
) -> Line<'static> {
    let mut spans = vec![Span::styled(
        "Weeks: ",
        Style::default().add_modifier(Modifier::BOLD),
    )];
    for (i, &week) in options.iter().enumerate() {
        let mark = if selected.contains(week) { "x" } else { " " };
        let style = if i == cursor {
            Style::default().fg(Color::Black).bg(Color::White)
        } else if selected.contains(week) {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(format!("[{mark}]{week}"), style));
        spans.push(Span::raw(" "));
    }
    Line::from(spans)
}

/// Case-insensitive match of the filter text against a team's number or
/// name. An empty filter matches everything.
pub fn matches_filter(filter_text: &str, team_number: u32, name: &str) -> bool {
    if filter_text.is_empty() {
        return true;
    }
    let needle = filter_text.to_lowercase();
    team_number.to_string().contains(&needle) || name.to_lowercase().contains(&needle)
}
