// Available teams widget: undrafted teams ranked by EPA.
//
// FiM leagues gate the list on the checked weeks; the text filter matches
// team number or name.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};
use ratatui::Frame;

use fim_core::board::{
    filter_available, format_epa, format_weeks, rank_sort_in_place, WeekSelection,
    DRAFT_WEEK_OPTIONS,
};
use fim_core::model::AvailableTeam;

use super::{matches_filter, ready_or_placeholder, week_selector_line};
use crate::tui::ViewState;

const TITLE: &str = "Available Teams";

/// Render the available teams table into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let Some(teams) = ready_or_placeholder(frame, area, TITLE, &state.available) else {
        return;
    };
    let is_fim = state.league.ready().is_some_and(|l| l.is_fim);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(3)])
        .split(area);

    let selector = if is_fim {
        week_selector_line(&DRAFT_WEEK_OPTIONS, &state.draft_weeks, state.week_cursor)
    } else {
        Line::from("All weeks (not a FiM league)")
    };
    frame.render_widget(Paragraph::new(selector), chunks[0]);

    let visible = visible_teams(teams, &state.draft_weeks, is_fim, &state.filter_text);

    let header = Row::new(vec!["#", "Team", "Name", "Weeks", "EPA"]).style(
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = visible
        .iter()
        .enumerate()
        .skip(state.scroll("available"))
        .map(|(i, team)| {
            Row::new(vec![
                Cell::from(format!("{}", i + 1)),
                Cell::from(team.team_number.to_string()),
                Cell::from(team.name.clone()),
                Cell::from(format_weeks(&team.events)),
                Cell::from(format_epa(team.year_end_epa)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(4),
        Constraint::Length(6),
        Constraint::Min(16),
        Constraint::Length(12),
        Constraint::Length(7),
    ];

    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .borders(Borders::ALL)
            .title(build_title(&state.filter_text, visible.len())),
    );
    frame.render_widget(table, chunks[1]);
}

/// Teams to list: gated by week for FiM leagues, matched against the filter
/// text, then ranked by EPA.
pub fn visible_teams<'a>(
    teams: &'a [AvailableTeam],
    selected: &WeekSelection,
    is_fim: bool,
    filter_text: &str,
) -> Vec<&'a AvailableTeam> {
    let mut visible: Vec<&AvailableTeam> = filter_available(teams, selected, is_fim)
        .into_iter()
        .filter(|t| matches_filter(filter_text, t.team_number, &t.name))
        .collect();
    rank_sort_in_place(&mut visible);
    visible
}

fn build_title(filter_text: &str, count: usize) -> String {
    let mut title = String::from(TITLE);
    if !filter_text.is_empty() {
        title.push_str(&format!(" \"{filter_text}\""));
    }
    title.push_str(&format!(" ({count})"));
    title
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
