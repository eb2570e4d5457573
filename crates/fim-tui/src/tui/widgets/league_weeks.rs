// League weeks widget: drafted-team event counts per week for every fantasy
// team, colored against the league's weekly starts.

use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};
use ratatui::Frame;

use fim_core::board::{coverage_status, league_week_coverage, Coverage, DRAFT_WEEK_OPTIONS};

use super::ready_or_placeholder;
use crate::tui::ViewState;

const TITLE: &str = "League Weeks";

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let Some(league) = ready_or_placeholder(frame, area, TITLE, &state.league) else {
        return;
    };
    if league.offseason {
        let paragraph = Paragraph::new("Offseason draft: see draft scores on the Scores tab.")
            .block(Block::default().borders(Borders::ALL).title(TITLE));
        frame.render_widget(paragraph, area);
        return;
    }
    let Some(teams) = ready_or_placeholder(frame, area, TITLE, &state.fantasy_teams) else {
        return;
    };
    let Some(picks) = ready_or_placeholder(frame, area, TITLE, &state.picks) else {
        return;
    };

    let header = Row::new(
        std::iter::once("Team".to_string())
            .chain(DRAFT_WEEK_OPTIONS.iter().map(|w| format!("Wk {w}"))),
    )
    .style(
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = league_week_coverage(teams, picks, &DRAFT_WEEK_OPTIONS)
        .into_iter()
        .skip(state.scroll("league_weeks"))
        .map(|row| {
            let cells = std::iter::once(Cell::from(row.team_name)).chain(
                row.counts.iter().map(|&(_, count)| {
                    let color = coverage_color(coverage_status(count, league.weekly_starts));
                    Cell::from(count.to_string()).style(Style::default().fg(color))
                }),
            );
            Row::new(cells)
        })
        .collect();

    let widths: Vec<Constraint> = std::iter::once(Constraint::Min(16))
        .chain(DRAFT_WEEK_OPTIONS.iter().map(|_| Constraint::Length(6)))
        .collect();

    let title = format!("{TITLE} ({} starts per week)", league.weekly_starts);
    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(table, area);
}

pub fn coverage_color(coverage: Coverage) -> Color {
    match coverage {
        Coverage::Full => Color::Green,
        Coverage::Short => Color::Yellow,
        Coverage::Uncovered => Color::Red,
    }
}
