// Status bar widget: draft id, pick progress, last refresh, tab indicator.

use chrono::{DateTime, Local};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::protocol::TabId;
use crate::tui::ViewState;

/// Render the status bar into the given area.
///
/// Layout: [draft id] [pick counter] [last refresh] [tab bar]
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let mut spans = Vec::new();

    let draft_label = match state.draft_id {
        Some(id) => format!(" Draft {id} "),
        None => " No draft ".to_string(),
    };
    spans.push(Span::styled(
        draft_label,
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    ));

    spans.push(Span::styled(
        pick_counter(state),
        Style::default().fg(Color::White),
    ));

    spans.push(Span::styled(" | ", Style::default().fg(Color::Gray)));
    spans.push(Span::styled(
        refreshed_label(state.last_refreshed),
        Style::default().fg(Color::Gray),
    ));
    spans.push(Span::styled(" | ", Style::default().fg(Color::Gray)));

    spans.extend(tab_spans(state.active_tab));

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, area);
}

/// `Pick 5/12`, or `Pick -/-` until the grid can be built.
pub fn pick_counter(state: &ViewState) -> String {
    match state.grid() {
        Some(Ok(grid)) => {
            let next = (grid.picked_count() + 1).min(grid.total_slots());
            format!("Pick {}/{}", next, grid.total_slots())
        }
        _ => "Pick -/-".to_string(),
    }
}

pub fn refreshed_label(at: Option<DateTime<Local>>) -> String {
    match at {
        Some(at) => format!("Updated {}", at.format("%H:%M:%S")),
        None => "Not yet updated".to_string(),
    }
}

/// Build tab indicator spans with the active tab highlighted.
/// E.g. "[1:Board] [2:Available] [3:Weeks] [4:Waivers] [5:Scores] [6:Events] [7:Rosters]"
pub fn tab_spans(active: TabId) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    for (i, tab_id) in TabId::ALL.into_iter().enumerate() {
        let style = if tab_id == active {
            Style::default()
                .fg(Color::Black)
                .bg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        spans.push(Span::styled(
            format!("[{}:{}]", i + 1, tab_label(tab_id)),
            style,
        ));
        spans.push(Span::raw(" "));
    }
    spans
}

/// Return the label for a tab.
pub fn tab_label(tab: TabId) -> &'static str {
    match tab {
        TabId::DraftBoard => "Board",
        TabId::Available => "Available",
        TabId::LeagueWeeks => "Weeks",
        TabId::Waivers => "Waivers",
        TabId::Scores => "Scores",
        TabId::EventData => "Events",
        TabId::Rosters => "Rosters",
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::SectionState;
    use chrono::TimeZone;
    use fim_core::model::{Draft, DraftOrderEntry, DraftPick, PickSelection};

    fn state_with_picks(picked: u32) -> ViewState {
        let mut state = ViewState::default();
        state.draft = SectionState::Ready(Draft {
            draft_id: 1,
            league_id: 7,
            event_key: None,
            rounds: 3,
        });
        state.draft_order = SectionState::Ready(
            (1..=4)
                .map(|id| DraftOrderEntry {
                    fantasy_team_id: id,
                    draft_slot: id,
                })
                .collect(),
        );
        state.picks = SectionState::Ready(
            (1..=picked)
                .map(|n| DraftPick {
                    pick_number: n,
                    fantasy_team_id: 1,
                    team_picked: PickSelection::Picked(n.to_string()),
                    events: Vec::new(),
                })
                .collect(),
        );
        state
    }

    #[test]
    fn pick_counter_before_grid_is_ready() {
        assert_eq!(pick_counter(&ViewState::default()), "Pick -/-");
    }

    #[test]
    fn pick_counter_shows_next_pick() {
        assert_eq!(pick_counter(&state_with_picks(4)), "Pick 5/12");
        assert_eq!(pick_counter(&state_with_picks(12)), "Pick 12/12");
    }

    #[test]
    fn refreshed_label_formats_time() {
        assert_eq!(refreshed_label(None), "Not yet updated");
        let at = Local.with_ymd_and_hms(2025, 3, 8, 9, 5, 7).unwrap();
        assert_eq!(refreshed_label(Some(at)), "Updated 09:05:07");
    }

    #[test]
    fn tab_spans_highlight_active() {
        let spans = tab_spans(TabId::LeagueWeeks);
        // 0=[1:Board], 1=" ", 2=[2:Available], 3=" ", 4=[3:Weeks]
        assert_eq!(spans[4].content, "[3:Weeks]");
        assert!(spans[4].style.add_modifier.contains(Modifier::BOLD));
        assert!(!spans[0].style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn tab_spans_contain_every_tab() {
        let spans = tab_spans(TabId::DraftBoard);
        let labels: Vec<&str> = spans
            .iter()
            .step_by(2)
            .map(|s| s.content.as_ref())
            .collect();
        assert_eq!(
            labels,
            vec![
                "[1:Board]",
                "[2:Available]",
                "[3:Weeks]",
                "[4:Waivers]",
                "[5:Scores]",
                "[6:Events]",
                "[7:Rosters]"
            ]
        );
    }

    #[test]
    fn render_does_not_panic() {
        let backend = ratatui::backend::TestBackend::new(160, 1);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let state = state_with_picks(2);
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
    }
}
