// Event strength table, sortable by any column.

use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Row, Table};
use ratatui::Frame;

use fim_core::board::EventColumn;
use fim_core::model::EventData;

use super::ready_or_placeholder;
use crate::tui::ViewState;

const TITLE: &str = "Event Data";

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let Some(events) = ready_or_placeholder(frame, area, TITLE, &state.event_data) else {
        return;
    };

    let header = Row::new(EventColumn::ALL.iter().enumerate().map(|(i, &column)| {
        let mut style = Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD);
        if i == state.event_column {
            style = style.fg(Color::Black).bg(Color::White);
        }
        Cell::from(format!("{}{}", column.title(), state.event_sort.arrow(column))).style(style)
    }));

    let rows: Vec<Row> = state
        .event_sort
        .sort(events)
        .into_iter()
        .skip(state.scroll("event_data"))
        .map(|event| Row::new(EventColumn::ALL.map(|column| cell_text(event, column))))
        .collect();

    let widths: Vec<Constraint> = EventColumn::ALL
        .iter()
        .map(|c| match c {
            EventColumn::Name => Constraint::Min(24),
            _ => Constraint::Length(13),
        })
        .collect();

    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("{TITLE} ({})", events.len())),
    );
    frame.render_widget(table, area);
}

/// Display text for one column of an event row. Average EPA is rounded to a
/// whole number; missing metrics show `N/A`.
pub fn cell_text(event: &EventData, column: EventColumn) -> String {
    let metric = |value: Option<f64>, decimals: usize| match value {
        Some(v) if v.is_finite() => format!("{v:.decimals$}"),
        _ => "N/A".to_string(),
    };
    match column {
        EventColumn::Name => event.event_name.clone(),
        EventColumn::TeamCount => event.teamcount.to_string(),
        EventColumn::MaxEpa => metric(event.maxepa, 1),
        EventColumn::Top8Epa => metric(event.top8epa, 1),
        EventColumn::Top24Epa => metric(event.top24epa, 1),
        EventColumn::AvgEpa => metric(event.avgepa, 0),
        EventColumn::MedianEpa => metric(event.medianepa, 1),
    }
}
