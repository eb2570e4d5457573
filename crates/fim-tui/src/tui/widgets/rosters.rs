// Rosters widget: every fantasy team's owned teams with the event each one
// attends per competition week.

use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Paragraph, Row, Table};
use ratatui::Frame;

use fim_core::links::strip_team_prefix;
use fim_core::model::{FantasyTeamRosterWeek, NamedEvent};

use super::ready_or_placeholder;
use crate::tui::ViewState;

const TITLE: &str = "Rosters";

/// Competition weeks shown as columns.
pub const ROSTER_WEEKS: [u32; 5] = [1, 2, 3, 4, 5];

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    if let Some(league) = state.league.ready() {
        if !league.is_fim {
            let paragraph = Paragraph::new("Roster weeks are only tracked for FiM leagues.")
                .block(Block::default().borders(Borders::ALL).title(TITLE));
            frame.render_widget(paragraph, area);
            return;
        }
    }
    let Some(rosters) = ready_or_placeholder(frame, area, TITLE, &state.roster_weeks) else {
        return;
    };

    let header = Row::new(
        ["Fantasy team".to_string(), "Team".to_string()]
            .into_iter()
            .chain(ROSTER_WEEKS.iter().map(|w| format!("Wk {w}"))),
    )
    .style(
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = roster_rows(rosters, &ROSTER_WEEKS)
        .into_iter()
        .skip(state.scroll("rosters"))
        .map(Row::new)
        .collect();

    let widths: Vec<Constraint> = [Constraint::Min(16), Constraint::Length(6)]
        .into_iter()
        .chain(ROSTER_WEEKS.iter().map(|_| Constraint::Length(14)))
        .collect();

    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("{TITLE} ({} fantasy teams)", rosters.len())),
    );
    frame.render_widget(table, area);
}

/// One row per owned team. The fantasy team name appears on its first row
/// only; a week cell holds the event attended that week, or is empty.
pub fn roster_rows(rosters: &[FantasyTeamRosterWeek], weeks: &[u32]) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    for fantasy_team in rosters {
        if fantasy_team.roster.is_empty() {
            let mut row = vec![fantasy_team.fantasy_team_name.clone(), "-".to_string()];
            row.extend(weeks.iter().map(|_| String::new()));
            rows.push(row);
            continue;
        }
        for (i, entry) in fantasy_team.roster.iter().enumerate() {
            let name = if i == 0 {
                fantasy_team.fantasy_team_name.clone()
            } else {
                String::new()
            };
            let mut row = vec![name, strip_team_prefix(&entry.team_key).to_string()];
            row.extend(weeks.iter().map(|&week| {
                entry
                    .events
                    .iter()
                    .filter(|e| e.week == week)
                    .map(event_label)
                    .collect::<Vec<_>>()
                    .join(", ")
            }));
            rows.push(row);
        }
    }
    rows
}

fn event_label(event: &NamedEvent) -> &str {
    if event.event_name.is_empty() {
        &event.event_key
    } else {
        &event.event_name
    }
}
