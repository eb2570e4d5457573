// Sidebar summary: league settings, EPA season, who is on the clock, and the
// most recent pick with its team links.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use fim_core::board::board_columns;
use fim_core::links::{avatar_url, team_page_url};

use super::ready_or_placeholder;
use crate::tui::ViewState;

const TITLE: &str = "League";

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    if state.draft_id.is_none() {
        let block = Block::default().borders(Borders::ALL).title(TITLE);
        frame.render_widget(block, area);
        return;
    }
    if ready_or_placeholder(frame, area, TITLE, &state.league).is_none() {
        return;
    }
    let paragraph = Paragraph::new(summary_lines(state))
        .block(Block::default().borders(Borders::ALL).title(TITLE))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn field(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("{label}: "),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(value),
    ])
}

fn yes_no(flag: bool) -> String {
    if flag { "yes" } else { "no" }.to_string()
}

/// Summary text for the loaded league. Empty until the league arrives.
pub fn summary_lines(state: &ViewState) -> Vec<Line<'static>> {
    let Some(league) = state.league.ready() else {
        return Vec::new();
    };
    let mut lines = vec![
        Line::from(Span::styled(
            league.league_name.clone(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        field("Season", league.year.to_string()),
        field("FiM", yes_no(league.is_fim)),
        field("Offseason", yes_no(league.offseason)),
        field("Weekly starts", league.weekly_starts.to_string()),
    ];

    let week = match state.current_week.ready() {
        Some(Some(status)) => format!("{} week {}", status.year, status.week),
        Some(None) => "none".to_string(),
        None => "…".to_string(),
    };
    lines.push(field("Current week", week));

    let epa_year = state
        .metric_year()
        .map_or_else(|| "…".to_string(), |y| y.to_string());
    lines.push(field("EPA season", epa_year));

    lines.push(field("On the clock", on_the_clock(state)));

    if let Some(team) = last_picked_team(state) {
        lines.push(Line::default());
        lines.push(field("Last pick", team.to_string()));
        lines.push(Line::from(Span::styled(
            team_page_url(team, league.year),
            Style::default().fg(Color::Blue),
        )));
        lines.push(Line::from(Span::styled(
            avatar_url(team, league.year),
            Style::default().fg(Color::DarkGray),
        )));
    }
    lines
}

/// Name of the seat whose pick is open next, `Draft complete` once every slot
/// is filled.
pub fn on_the_clock(state: &ViewState) -> String {
    let Some(Ok(grid)) = state.grid() else {
        return "…".to_string();
    };
    let Some((column, cell)) = grid.on_the_clock() else {
        return "Draft complete".to_string();
    };
    let name = state
        .draft_order
        .ready()
        .map(|order| {
            let teams = state.fantasy_teams.ready().map_or(&[][..], Vec::as_slice);
            board_columns(order, teams)
        })
        .and_then(|columns| columns.get(column).map(|c| c.display_name().to_string()))
        .unwrap_or_else(|| "--".to_string());
    format!("{name} (pick {})", cell.overall)
}

/// Team number of the latest resolved pick.
pub fn last_picked_team(state: &ViewState) -> Option<&str> {
    state
        .picks
        .ready()?
        .iter()
        .filter_map(|p| p.team_picked.team())
        .next_back()
}
