// Draft board widget: the snake grid with one column per draft-order seat.
//
// Each cell shows the drafted team and its EPA for the metric season, or the
// `round.pick` label while the slot is open. The slot on the clock is
// highlighted.

use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};
use ratatui::Frame;

use fim_core::board::{board_columns, format_epa, GridCell};

use super::ready_or_placeholder;
use crate::protocol::SectionState;
use crate::tui::{PickEpa, ViewState};

const TITLE: &str = "Draft Board";

/// Render the draft board into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let Some(draft) = ready_or_placeholder(frame, area, TITLE, &state.draft) else {
        return;
    };
    let Some(order) = ready_or_placeholder(frame, area, TITLE, &state.draft_order) else {
        return;
    };
    if ready_or_placeholder(frame, area, TITLE, &state.picks).is_none() {
        return;
    }
    let grid = match state.grid() {
        Some(Ok(grid)) => grid,
        Some(Err(err)) => {
            let paragraph = Paragraph::new(Line::from(format!("Cannot build board: {err}")))
                .style(Style::default().fg(Color::Red))
                .block(Block::default().borders(Borders::ALL).title(TITLE));
            frame.render_widget(paragraph, area);
            return;
        }
        None => return,
    };

    let teams = state.fantasy_teams.ready().map_or(&[][..], Vec::as_slice);
    let columns = board_columns(order, teams);
    let on_clock = grid.on_the_clock().map(|(_, cell)| cell.overall);
    let pick_epa = state.pick_epa.ready();

    let header = Row::new(
        std::iter::once(Cell::from("Rd")).chain(
            columns
                .iter()
                .map(|c| Cell::from(c.display_name().to_string())),
        ),
    )
    .style(
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = grid
        .rows()
        .iter()
        .enumerate()
        .skip(state.scroll("draft_board"))
        .map(|(round_idx, row)| {
            let cells = std::iter::once(Cell::from(format!("{}", round_idx + 1))).chain(
                row.iter().map(|cell| {
                    let style = if Some(cell.overall) == on_clock {
                        Style::default()
                            .fg(Color::Black)
                            .bg(Color::Yellow)
                            .add_modifier(Modifier::BOLD)
                    } else if cell.slot.is_open() {
                        Style::default().fg(Color::DarkGray)
                    } else {
                        Style::default()
                    };
                    Cell::from(cell_text(cell, pick_epa)).style(style)
                }),
            );
            Row::new(cells)
        })
        .collect();

    let widths: Vec<Constraint> = std::iter::once(Constraint::Length(3))
        .chain(columns.iter().map(|_| Constraint::Min(8)))
        .collect();

    let title = format!(
        "{TITLE} ({} rounds, {}/{} picked){}",
        draft.rounds,
        grid.picked_count(),
        grid.total_slots(),
        epa_title_suffix(&state.pick_epa),
    );
    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(table, area);
}

/// Text of one grid cell: `team epa` when picked, else the `round.pick`
/// label.
pub fn cell_text(cell: &GridCell, pick_epa: Option<&PickEpa>) -> String {
    match cell.slot.team() {
        Some(team) => format!("{team} {}", epa_text(team, pick_epa)),
        None => format!("{}.{}", cell.round, cell.pick_in_round),
    }
}

/// A picked team's EPA, `…` while it is still being looked up.
pub fn epa_text(team: &str, pick_epa: Option<&PickEpa>) -> String {
    match pick_epa.and_then(|e| e.values.get(team)) {
        Some(value) => format_epa(*value),
        None => "…".to_string(),
    }
}

fn epa_title_suffix(pick_epa: &SectionState<PickEpa>) -> String {
    match pick_epa {
        SectionState::Ready(epa) => format!(" EPA {}", epa.year),
        SectionState::Loading => String::new(),
        SectionState::Failed(_) => " EPA unavailable".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
