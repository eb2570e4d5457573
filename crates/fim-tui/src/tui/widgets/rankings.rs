// League standings in server order.

use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Row, Table};
use ratatui::Frame;

use fim_core::model::LeagueRanking;

use super::ready_or_placeholder;
use crate::tui::ViewState;

const TITLE: &str = "Rankings";

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    if state.draft_id.is_none() {
        frame.render_widget(Block::default().borders(Borders::ALL).title(TITLE), area);
        return;
    }
    let Some(rankings) = ready_or_placeholder(frame, area, TITLE, &state.rankings) else {
        return;
    };

    let header = Row::new(vec!["#", "Team", "Pts", "TB"]).style(
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    );
    let rows: Vec<Row> = ranking_rows(rankings)
        .into_iter()
        .map(|cells| Row::new(cells.map(Cell::from)))
        .collect();
    let widths = [
        Constraint::Length(3),
        Constraint::Min(10),
        Constraint::Length(6),
        Constraint::Length(6),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(TITLE));
    frame.render_widget(table, area);
}

/// Cell text per standing: place, name, total points, tiebreaker.
pub fn ranking_rows(rankings: &[LeagueRanking]) -> Vec<[String; 4]> {
    rankings
        .iter()
        .enumerate()
        .map(|(i, r)| {
            [
                (i + 1).to_string(),
                r.fantasy_team_name.clone(),
                format!("{:.0}", r.total_ranking_points),
                format!("{:.1}", r.tiebreaker),
            ]
        })
        .collect()
}
