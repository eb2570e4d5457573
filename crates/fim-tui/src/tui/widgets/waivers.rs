// Waivers widget: teams on waivers with their event per week, next to the
// league's waiver priority.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph, Row, Table};
use ratatui::Frame;

use fim_core::board::{format_epa, waiver_epa_year, waiver_rows, WaiverRow, WAIVER_WEEK_OPTIONS};
use fim_core::model::WaiverPriority;

use super::{matches_filter, ready_or_placeholder, week_selector_line};
use crate::tui::ViewState;

const TITLE: &str = "Teams on Waivers";
const PRIORITY_TITLE: &str = "Waiver Priority";

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(75), Constraint::Percentage(25)])
        .split(area);

    render_teams(frame, columns[0], state);

    if let Some(priority) =
        ready_or_placeholder(frame, columns[1], PRIORITY_TITLE, &state.waiver_priority)
    {
        let items: Vec<ListItem> = priority_lines(priority)
            .into_iter()
            .map(ListItem::new)
            .collect();
        let list =
            List::new(items).block(Block::default().borders(Borders::ALL).title(PRIORITY_TITLE));
        frame.render_widget(list, columns[1]);
    }
}

fn render_teams(frame: &mut Frame, area: Rect, state: &ViewState) {
    let Some(league) = ready_or_placeholder(frame, area, TITLE, &state.league) else {
        return;
    };
    let Some(teams) = ready_or_placeholder(frame, area, TITLE, &state.waivers) else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(3)])
        .split(area);

    let selector = if league.is_fim {
        week_selector_line(&WAIVER_WEEK_OPTIONS, &state.waiver_weeks, state.week_cursor)
    } else {
        Line::from("All weeks (not a FiM league)")
    };
    frame.render_widget(Paragraph::new(selector), chunks[0]);

    let rows: Vec<WaiverRow> = waiver_rows(
        teams,
        &WAIVER_WEEK_OPTIONS,
        &state.waiver_weeks,
        league.is_fim,
    )
    .into_iter()
    .filter(|r| matches_filter(&state.filter_text, r.team_number, &r.team_name))
    .collect();
    let count = rows.len();

    let header = Row::new(
        ["Team".to_string(), "Name".to_string()]
            .into_iter()
            .chain(WAIVER_WEEK_OPTIONS.iter().map(|w| format!("Wk {w}")))
            .chain(std::iter::once(format!("{} EPA", waiver_epa_year(league)))),
    )
    .style(
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    );

    let table_rows: Vec<Row> = rows
        .into_iter()
        .skip(state.scroll("waivers"))
        .map(|row| {
            let cells = [row.team_number.to_string(), row.team_name]
                .into_iter()
                .chain(row.week_events.into_iter().map(Option::unwrap_or_default))
                .chain(std::iter::once(format_epa(row.year_end_epa)));
            Row::new(cells)
        })
        .collect();

    let widths: Vec<Constraint> = [Constraint::Length(6), Constraint::Min(14)]
        .into_iter()
        .chain(WAIVER_WEEK_OPTIONS.iter().map(|_| Constraint::Length(10)))
        .chain(std::iter::once(Constraint::Length(9)))
        .collect();

    let table = Table::new(table_rows, widths).header(header).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("{TITLE} ({count})")),
    );
    frame.render_widget(table, chunks[1]);
}

/// `1. Name` per fantasy team, in server order.
pub fn priority_lines(priority: &[WaiverPriority]) -> Vec<String> {
    priority
        .iter()
        .map(|p| format!("{}. {}", p.priority, p.fantasy_team_name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::SectionState;
    use fim_core::model::{League, TeamEvent, WaiverTeam};

    fn priority(name: &str, n: u32) -> WaiverPriority {
        WaiverPriority {
            fantasy_team_id: n,
            fantasy_team_name: name.into(),
            priority: n,
        }
    }

    #[test]
    fn priority_keeps_server_order() {
        let lines = priority_lines(&[priority("Alpha", 1), priority("Bravo", 2)]);
        assert_eq!(lines, vec!["1. Alpha", "2. Bravo"]);
    }

    #[test]
    fn render_does_not_panic() {
        let backend = ratatui::backend::TestBackend::new(140, 20);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let mut state = ViewState::default();
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();

        state.league = SectionState::Ready(League {
            league_id: 7,
            league_name: "Test League".into(),
            year: 2025,
            is_fim: true,
            offseason: false,
            weekly_starts: 2,
            team_limit: None,
            team_size_limit: None,
        });
        state.waivers = SectionState::Ready(vec![WaiverTeam {
            team_number: 33,
            name: "Killer Bees".into(),
            events: vec![TeamEvent {
                event_key: "2025mitvc".into(),
                week: 2,
            }],
            year_end_epa: Some(41.5),
        }]);
        state.waiver_priority = SectionState::Ready(vec![priority("Alpha", 1)]);
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
    }
}
